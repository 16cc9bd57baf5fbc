//! Forage target selection
//!
//! Items belong to the round orchestrator; this module only reads their
//! position and active flag.

use glam::Vec2;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::types::ConsumableId;

/// A consumable item as seen by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumable {
    pub id: ConsumableId,
    pub position: Vec2,
    pub active: bool,
    pub points: u32,
}

impl Consumable {
    pub fn new(id: u32, position: Vec2, points: u32) -> Self {
        Self {
            id: ConsumableId(id),
            position,
            active: true,
            points,
        }
    }
}

/// Provider of the shared consumable list
pub trait ForageSource {
    fn consumables(&self) -> &[Consumable];
}

impl ForageSource for [Consumable] {
    fn consumables(&self) -> &[Consumable] {
        self
    }
}

impl ForageSource for Vec<Consumable> {
    fn consumables(&self) -> &[Consumable] {
        self
    }
}

/// Position of the closest active candidate strictly inside `max_radius`
///
/// Linear scan; the first of several equidistant candidates wins.
pub fn nearest(
    agent_pos: Vec2,
    candidates: impl IntoIterator<Item = (Vec2, bool)>,
    max_radius: f32,
) -> Option<Vec2> {
    candidates
        .into_iter()
        .filter(|(_, active)| *active)
        .map(|(pos, _)| (pos, agent_pos.distance(pos)))
        .filter(|(_, dist)| *dist < max_radius)
        .min_by_key(|(_, dist)| OrderedFloat(*dist))
        .map(|(pos, _)| pos)
}

/// Closest active consumable strictly inside `max_radius`
pub fn nearest_consumable(
    agent_pos: Vec2,
    items: &[Consumable],
    max_radius: f32,
) -> Option<&Consumable> {
    let position = nearest(
        agent_pos,
        items.iter().map(|item| (item.position, item.active)),
        max_radius,
    )?;
    items
        .iter()
        .find(|item| item.active && item.position == position)
}

/// Look up an item that is still active
pub fn active_item(items: &[Consumable], id: ConsumableId) -> Option<&Consumable> {
    items.iter().find(|item| item.id == id && item.active)
}

/// Per-agent forage target with a refresh timer
///
/// The nearest-item lookup runs on a fixed interval rather than every
/// tick, except that a vanished target is replaced immediately.
#[derive(Debug, Clone, Default)]
pub struct ForageTracker {
    target: Option<ConsumableId>,
    refresh_timer: f32,
}

impl ForageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target(&self) -> Option<ConsumableId> {
        self.target
    }

    /// Position of the current target if it is still active
    pub fn target_position(&self, items: &[Consumable]) -> Option<Vec2> {
        self.target
            .and_then(|id| active_item(items, id))
            .map(|item| item.position)
    }

    /// Advance the refresh timer and re-select if due
    ///
    /// Returns `Some(new_target)` when the target changed.
    pub fn update(
        &mut self,
        agent_pos: Vec2,
        items: &[Consumable],
        search_radius: f32,
        interval: f32,
        dt: f32,
    ) -> Option<Option<ConsumableId>> {
        self.refresh_timer -= dt;

        let target_gone = match self.target {
            Some(id) => active_item(items, id).is_none(),
            None => true,
        };

        if self.refresh_timer > 0.0 && !target_gone {
            return None;
        }

        self.refresh_timer = interval;
        let found = nearest_consumable(agent_pos, items, search_radius).map(|item| item.id);
        if found != self.target {
            self.target = found;
            Some(found)
        } else {
            None
        }
    }

    /// Drop the target so the next update performs a fresh lookup
    pub fn clear(&mut self) {
        self.target = None;
        self.refresh_timer = 0.0;
    }
}
