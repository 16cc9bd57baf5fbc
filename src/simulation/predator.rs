//! The pursuing predator and scripted control
//!
//! Input devices are out of scope: the predator receives already-resolved
//! direction commands, either from a caller or from a `PredatorScript`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::config::MotionConfig;
use crate::core::types::Direction;
use crate::motion::controller::{MotionController, TurnOutcome};
use crate::motion::obstacles::ObstacleProbe;
use crate::sensing::threat::ThreatSource;

#[derive(Debug, Clone)]
pub struct Predator {
    pub motion: MotionController,
}

impl Predator {
    pub fn new(position: Vec2, config: &MotionConfig) -> Self {
        Self {
            motion: MotionController::new(position, None, config),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.motion.position()
    }

    /// Request a turn; blocked turns wait as pending like any agent's
    pub fn command(&mut self, dir: Direction, obstacles: &dyn ObstacleProbe) -> TurnOutcome {
        self.motion.set_direction(dir, false, obstacles)
    }

    pub fn tick(&mut self, obstacles: &dyn ObstacleProbe, dt: f32) {
        self.motion.retry_pending(obstacles);
        self.motion.update_modifiers(dt);
        self.motion.tick(dt);
    }

    pub fn reset(&mut self) {
        self.motion.reset();
    }
}

impl ThreatSource for Predator {
    fn threat_position(&self) -> Option<Vec2> {
        Some(self.position())
    }
}

impl ThreatSource for Option<Predator> {
    fn threat_position(&self) -> Option<Vec2> {
        self.as_ref().map(Predator::position)
    }
}

/// A direction command issued at a point in simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedCommand {
    /// Seconds since round start
    pub at: f32,
    pub direction: Direction,
}

/// Timed sequence of predator commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredatorScript {
    commands: Vec<ScriptedCommand>,
    #[serde(skip)]
    cursor: usize,
}

impl PredatorScript {
    /// Commands are sorted by time; equal times keep their input order
    pub fn new(mut commands: Vec<ScriptedCommand>) -> Self {
        commands.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { commands, cursor: 0 }
    }

    /// Commands that became due at or before `elapsed` since the last call
    pub fn due(&mut self, elapsed: f32) -> &[ScriptedCommand] {
        let start = self.cursor;
        while self
            .commands
            .get(self.cursor)
            .is_some_and(|c| c.at <= elapsed)
        {
            self.cursor += 1;
        }
        &self.commands[start..self.cursor]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    /// Rewind to the first command
    pub fn restart(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
