//! Continuous movement along committed cardinal directions
//!
//! Obstacles are consulted only when the direction changes. Once a
//! direction is committed the controller integrates unconditionally; there
//! is no per-tick collision resolution.

use glam::Vec2;

use crate::core::config::MotionConfig;
use crate::core::error::Result;
use crate::core::types::Direction;
use crate::motion::modifiers::{ModifierId, SpeedModifiers};
use crate::motion::obstacles::ObstacleProbe;

/// Outcome of a direction request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Direction committed immediately
    Committed,
    /// Path blocked; stored as pending and retried each tick
    Deferred,
}

#[derive(Debug, Clone)]
pub struct MotionController {
    position: Vec2,
    direction: Option<Direction>,
    pending: Option<Direction>,
    speed: f32,
    /// State-driven multiplier (foraging or panic factor)
    base_multiplier: f32,
    /// Externally applied multipliers, composed on top of the base
    modifiers: SpeedModifiers,
    starting_position: Vec2,
    initial_direction: Option<Direction>,
    footprint: Vec2,
    probe_distance: f32,
    probe_along: f32,
    probe_across: f32,
}

impl MotionController {
    pub fn new(position: Vec2, initial_direction: Option<Direction>, config: &MotionConfig) -> Self {
        Self {
            position,
            direction: initial_direction,
            pending: None,
            speed: config.speed,
            base_multiplier: 1.0,
            modifiers: SpeedModifiers::new(),
            starting_position: position,
            initial_direction,
            footprint: config.footprint,
            probe_distance: config.probe_distance,
            probe_along: config.probe_along,
            probe_across: config.probe_across,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport without touching direction state
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Move the reset point (and the position) to a new spawn
    pub fn set_starting_position(&mut self, position: Vec2) {
        self.starting_position = position;
        self.position = position;
    }

    /// Committed travel direction, `None` when stationary
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending
    }

    /// Direction the owner intends to travel: the queued turn if any,
    /// otherwise the committed direction
    pub fn heading(&self) -> Option<Direction> {
        self.pending.or(self.direction)
    }

    /// Request a direction change
    ///
    /// Commits when `forced` or when the probe is clear; otherwise queues
    /// the request as the pending direction.
    pub fn set_direction(
        &mut self,
        dir: Direction,
        forced: bool,
        obstacles: &dyn ObstacleProbe,
    ) -> TurnOutcome {
        if forced || !self.is_occupied(dir, obstacles) {
            self.direction = Some(dir);
            self.pending = None;
            TurnOutcome::Committed
        } else {
            self.pending = Some(dir);
            TurnOutcome::Deferred
        }
    }

    /// Probe a short distance along `dir` for obstacles
    ///
    /// The probe box is long along the probe axis and narrow across it.
    pub fn is_occupied(&self, dir: Direction, obstacles: &dyn ObstacleProbe) -> bool {
        let size = if dir.is_horizontal() {
            Vec2::new(
                self.footprint.x * self.probe_along,
                self.footprint.y * self.probe_across,
            )
        } else {
            Vec2::new(
                self.footprint.x * self.probe_across,
                self.footprint.y * self.probe_along,
            )
        };
        obstacles.box_cast(self.position, size, dir.vector(), self.probe_distance)
    }

    /// Re-run the probe for a queued turn, committing it once clear
    pub fn retry_pending(&mut self, obstacles: &dyn ObstacleProbe) -> bool {
        match self.pending {
            Some(dir) => self.set_direction(dir, false, obstacles) == TurnOutcome::Committed,
            None => false,
        }
    }

    /// Centre the agent on the lane through `anchor`
    ///
    /// Only the coordinate across the committed direction moves, so a turn
    /// that committed a little off-centre continues along the node's row or
    /// column.
    pub fn align_to_lane(&mut self, anchor: Vec2) {
        match self.direction {
            Some(dir) if dir.is_horizontal() => self.position.y = anchor.y,
            Some(_) => self.position.x = anchor.x,
            None => {}
        }
    }

    /// Advance position along the committed direction
    pub fn tick(&mut self, dt: f32) {
        if let Some(dir) = self.direction {
            self.position += dir.vector() * self.speed * self.speed_multiplier() * dt;
        }
    }

    /// Count down timed speed modifiers; returns those that expired
    pub fn update_modifiers(&mut self, dt: f32) -> Vec<ModifierId> {
        self.modifiers.tick(dt)
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Effective multiplier: state base times every active modifier
    pub fn speed_multiplier(&self) -> f32 {
        self.base_multiplier * self.modifiers.product()
    }

    pub fn base_multiplier(&self) -> f32 {
        self.base_multiplier
    }

    pub(crate) fn set_base_multiplier(&mut self, multiplier: f32) {
        debug_assert!(multiplier > 0.0);
        self.base_multiplier = multiplier;
    }

    /// Scale speed until the returned handle is reverted
    pub fn push_modifier(&mut self, factor: f32) -> Result<ModifierId> {
        self.modifiers.push(factor)
    }

    /// Scale speed for `duration` seconds
    pub fn apply_modifier(&mut self, factor: f32, duration: f32) -> Result<ModifierId> {
        self.modifiers.push_timed(factor, duration)
    }

    pub fn revert_modifier(&mut self, id: ModifierId) -> bool {
        self.modifiers.revert(id)
    }

    pub fn active_modifiers(&self) -> usize {
        self.modifiers.len()
    }

    /// Restore spawn position, initial direction and unit speed
    pub fn reset(&mut self) {
        self.position = self.starting_position;
        self.direction = self.initial_direction;
        self.pending = None;
        self.base_multiplier = 1.0;
        self.modifiers.clear();
    }
}
