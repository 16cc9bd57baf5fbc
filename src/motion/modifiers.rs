//! Composable speed modifiers
//!
//! External effects scale speed by pushing a factor and later reverting
//! that same factor. The effective multiplier is the product of all active
//! factors, so overlapping effects neither clobber nor reorder each other.

use serde::{Deserialize, Serialize};

use crate::core::error::{ChaseError, Result};

/// Handle returned when a modifier is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModifierId(pub u32);

#[derive(Debug, Clone)]
struct SpeedModifier {
    id: ModifierId,
    factor: f32,
    /// Seconds left, `None` for modifiers reverted explicitly
    remaining: Option<f32>,
}

/// Stack of active multiplicative speed modifiers
#[derive(Debug, Clone, Default)]
pub struct SpeedModifiers {
    active: Vec<SpeedModifier>,
    next_id: u32,
}

impl SpeedModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a modifier that stays until reverted
    pub fn push(&mut self, factor: f32) -> Result<ModifierId> {
        self.insert(factor, None)
    }

    /// Push a modifier that expires after `duration` seconds
    pub fn push_timed(&mut self, factor: f32, duration: f32) -> Result<ModifierId> {
        if !(duration >= 0.0) {
            return Err(ChaseError::InvalidParameter(format!(
                "modifier duration ({duration}) must be non-negative"
            )));
        }
        self.insert(factor, Some(duration))
    }

    fn insert(&mut self, factor: f32, remaining: Option<f32>) -> Result<ModifierId> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(ChaseError::InvalidParameter(format!(
                "speed factor ({factor}) must be positive and finite"
            )));
        }
        let id = ModifierId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push(SpeedModifier {
            id,
            factor,
            remaining,
        });
        Ok(id)
    }

    /// Remove a modifier. Returns false if it was already gone.
    pub fn revert(&mut self, id: ModifierId) -> bool {
        let before = self.active.len();
        self.active.retain(|m| m.id != id);
        self.active.len() != before
    }

    /// Count down timed modifiers, dropping expired ones
    ///
    /// Returns the ids that expired this call.
    pub fn tick(&mut self, dt: f32) -> Vec<ModifierId> {
        let mut expired = Vec::new();
        for modifier in &mut self.active {
            if let Some(remaining) = modifier.remaining.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    expired.push(modifier.id);
                }
            }
        }
        self.active.retain(|m| !expired.contains(&m.id));
        expired
    }

    /// Product of all active factors (1.0 when none are active)
    pub fn product(&self) -> f32 {
        self.active.iter().map(|m| m.factor).product()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
