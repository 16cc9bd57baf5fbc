//! Prey agents: per-agent state and the decision engine that drives it

pub mod engine;
pub mod memory;
pub mod scoring;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::ChaseConfig;
use crate::core::types::{AgentId, ConsumableId, Direction};
use crate::motion::controller::MotionController;
use crate::sensing::forage::ForageTracker;

pub use engine::{AgentEvent, DecisionContext, DecisionEngine};
pub use memory::{DirectionMemo, RecentNodes};
pub use scoring::{CandidateScore, ScoringWeights};

/// Behavior state of a prey agent
///
/// Exactly one holds at any time; there is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AgentState {
    #[default]
    Foraging,
    Panicking,
}

/// A prey agent
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    pub motion: MotionController,
    pub(crate) state: AgentState,
    /// Seconds of panic left once the threat is out of range
    pub(crate) panic_timer: f32,
    pub(crate) recent: RecentNodes,
    pub(crate) memo: DirectionMemo,
    /// Node position of the last waypoint decision
    pub(crate) last_decision: Option<Vec2>,
    pub(crate) forage: ForageTracker,
    normal_speed: f32,
}

impl Agent {
    pub fn new(
        id: AgentId,
        position: Vec2,
        initial_direction: Option<Direction>,
        config: &ChaseConfig,
    ) -> Self {
        let mut motion = MotionController::new(position, initial_direction, &config.motion);
        motion.set_base_multiplier(config.agent.normal_speed);
        Self {
            id,
            motion,
            state: AgentState::Foraging,
            panic_timer: 0.0,
            recent: RecentNodes::new(config.agent.history_len),
            memo: DirectionMemo::new(config.agent.memo_capacity),
            last_decision: None,
            forage: ForageTracker::new(),
            normal_speed: config.agent.normal_speed,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn is_panicking(&self) -> bool {
        self.state == AgentState::Panicking
    }

    pub fn panic_timer(&self) -> f32 {
        self.panic_timer
    }

    pub fn position(&self) -> Vec2 {
        self.motion.position()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.motion.direction()
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.motion.speed_multiplier()
    }

    /// Recently visited node positions, oldest first
    pub fn recent_nodes(&self) -> &RecentNodes {
        &self.recent
    }

    pub fn direction_memo(&self) -> &DirectionMemo {
        &self.memo
    }

    pub fn last_decision(&self) -> Option<Vec2> {
        self.last_decision
    }

    pub fn forage_target(&self) -> Option<ConsumableId> {
        self.forage.target()
    }

    /// Teleport the agent; decision memory is kept
    pub fn set_position(&mut self, position: Vec2) {
        self.motion.set_position(position);
    }

    /// Move the spawn point used by `reset`, and the agent with it
    pub fn set_spawn(&mut self, position: Vec2) {
        self.motion.set_starting_position(position);
    }

    /// Return to spawn in the foraging state with all memory cleared
    pub fn reset(&mut self) {
        self.motion.reset();
        self.motion.set_base_multiplier(self.normal_speed);
        self.state = AgentState::Foraging;
        self.panic_timer = 0.0;
        self.recent.clear();
        self.memo.clear();
        self.last_decision = None;
        self.forage.clear();
    }

    /// Distance check offered to the orchestrator; the core never acts on it
    pub fn is_caught_by(&self, threat_pos: Vec2, radius: f32) -> bool {
        self.position().distance(threat_pos) <= radius
    }
}
