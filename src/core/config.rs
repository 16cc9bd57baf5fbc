//! Simulation configuration with documented constants
//!
//! All tunable numbers are collected here with explanations of their purpose
//! and how they interact with each other. Every section deserializes with
//! `#[serde(default)]`, so a TOML file only needs to name what it overrides.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::agent::scoring::ScoringWeights;
use crate::core::error::{ChaseError, Result};

/// Per-agent behavior parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Distance at which the predator triggers panic (world units)
    pub detection_range: f32,

    /// Speed multiplier while foraging
    pub normal_speed: f32,

    /// Speed multiplier while panicking
    ///
    /// Applied as the base multiplier; power-up modifiers stack on top.
    pub panic_speed: f32,

    /// Seconds the agent keeps panicking after the predator leaves range
    pub panic_duration: f32,

    /// Radius for forage target lookup and the food alignment bonus
    pub food_search_radius: f32,

    /// Seconds between forage target refreshes
    ///
    /// A target that goes inactive is replaced immediately regardless.
    pub forage_refresh_interval: f32,

    /// Minimum displacement from the previous decision point before the
    /// agent may decide again
    ///
    /// Must exceed the capture radius, otherwise an agent can decide twice
    /// while passing through one node.
    pub decision_displacement: f32,

    /// Number of recently visited nodes remembered for the revisit penalty
    pub history_len: usize,

    /// Maximum number of per-node direction memos kept
    pub memo_capacity: usize,

    /// Distance under which two node positions count as the same node
    pub revisit_tolerance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            detection_range: 5.0,
            normal_speed: 1.0,
            panic_speed: 2.0,
            panic_duration: 3.0,
            food_search_radius: 15.0,
            forage_refresh_interval: 0.5,
            decision_displacement: 0.8,
            history_len: 3,
            memo_capacity: 8,
            revisit_tolerance: 0.5,
        }
    }
}

/// Continuous movement parameters shared by agents and the predator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Base travel speed (world units per second)
    pub speed: f32,

    /// Agent bounding box (width, height)
    pub footprint: Vec2,

    /// How far the obstacle probe is swept (world units)
    pub probe_distance: f32,

    /// Probe box extent along the probe axis, as a fraction of the footprint
    pub probe_along: f32,

    /// Probe box extent across the probe axis, as a fraction of the footprint
    ///
    /// Narrower than the footprint so a probe into a corridor does not
    /// graze the corridor walls.
    pub probe_across: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            footprint: Vec2::ONE,
            probe_distance: 0.1,
            probe_along: 0.9,
            probe_across: 0.6,
        }
    }
}

/// Waypoint graph parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Radius around a node inside which an agent counts as "at" the node
    pub capture_radius: f32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { capture_radius: 0.4 }
    }
}

/// Fixed-step loop parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seconds per simulation tick
    pub fixed_dt: f32,

    /// Distance at which the predator catches an agent
    ///
    /// Only used by the harness; the core exposes the distance check.
    pub catch_radius: f32,

    /// Seed for initial headings
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            catch_radius: 0.5,
            seed: 0,
        }
    }
}

/// Complete configuration for a chase simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    pub agent: AgentConfig,
    pub weights: ScoringWeights,
    pub motion: MotionConfig,
    pub graph: GraphConfig,
    pub simulation: SimulationConfig,
}

impl ChaseConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ChaseConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration for internal consistency
    ///
    /// Hard violations are errors. A weight ordering that departs from the
    /// reference behavior is only logged, since weights are tunable.
    pub fn validate(&self) -> Result<()> {
        let agent = &self.agent;
        if agent.normal_speed <= 0.0 || agent.panic_speed <= 0.0 {
            return Err(ChaseError::InvalidParameter(
                "speed multipliers must be positive".into(),
            ));
        }
        if self.motion.speed <= 0.0 {
            return Err(ChaseError::InvalidParameter(format!(
                "motion.speed ({}) must be positive",
                self.motion.speed
            )));
        }
        if agent.detection_range < 0.0 || agent.food_search_radius <= 0.0 {
            return Err(ChaseError::InvalidParameter(
                "detection_range must be non-negative and food_search_radius positive".into(),
            ));
        }
        if agent.panic_duration < 0.0 || agent.forage_refresh_interval < 0.0 {
            return Err(ChaseError::InvalidParameter(
                "durations must be non-negative".into(),
            ));
        }
        if agent.history_len == 0 {
            return Err(ChaseError::InvalidParameter(
                "history_len must be at least 1".into(),
            ));
        }
        if self.graph.capture_radius <= 0.0 {
            return Err(ChaseError::InvalidParameter(format!(
                "graph.capture_radius ({}) must be positive",
                self.graph.capture_radius
            )));
        }
        if agent.decision_displacement <= self.graph.capture_radius {
            return Err(ChaseError::InvalidParameter(format!(
                "decision_displacement ({}) must exceed capture_radius ({})",
                agent.decision_displacement, self.graph.capture_radius
            )));
        }
        if self.simulation.fixed_dt <= 0.0 {
            return Err(ChaseError::InvalidParameter(
                "simulation.fixed_dt must be positive".into(),
            ));
        }
        if self.motion.footprint.min_element() <= 0.0 {
            return Err(ChaseError::InvalidParameter(
                "motion.footprint must be positive on both axes".into(),
            ));
        }

        if !self.weights.has_reference_ordering() {
            tracing::warn!(
                "Scoring weights depart from revisit > food >= target > threat > continue: {:?}",
                self.weights
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChaseConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ChaseConfig::from_toml_str(
            r#"
            [agent]
            detection_range = 7.5

            [weights]
            food = 12.0
            "#,
        )
        .unwrap();

        assert_eq!(config.agent.detection_range, 7.5);
        assert_eq!(config.agent.panic_speed, 2.0);
        assert_eq!(config.weights.food, 12.0);
        assert_eq!(config.weights.revisit, 100.0);
        assert_eq!(config.motion.speed, 4.0);
    }

    #[test]
    fn test_rejects_non_positive_panic_speed() {
        let mut config = ChaseConfig::default();
        config.agent.panic_speed = 0.0;
        assert!(matches!(config.validate(), Err(ChaseError::InvalidParameter(_))));
    }

    #[test]
    fn test_rejects_displacement_inside_capture_radius() {
        let mut config = ChaseConfig::default();
        config.agent.decision_displacement = 0.3;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_history() {
        let mut config = ChaseConfig::default();
        config.agent.history_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_reported() {
        let result = ChaseConfig::from_toml_str("[agent]\ndetection_range = \"far\"");
        assert!(matches!(result, Err(ChaseError::Toml(_))));
    }
}
