//! Core type definitions used throughout the codebase

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Unique identifier for prey agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Identifier of a waypoint node (index into the graph's node list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Identifier of a consumable item (index into the provider's item list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConsumableId(pub u32);

/// Simulation time unit
pub type Tick = u64;

/// One of the four cardinal travel directions
///
/// `ALL` is the canonical enumeration order. Every tie-break in the crate
/// resolves to the earliest direction in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector for this direction (+y is up)
    pub fn vector(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::Y,
            Direction::Right => Vec2::X,
            Direction::Down => Vec2::NEG_Y,
            Direction::Left => Vec2::NEG_X,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Alignment of this direction with an arbitrary vector
    #[inline]
    pub fn dot(self, v: Vec2) -> f32 {
        self.vector().dot(v)
    }

    /// Cardinal direction best aligned with `v`
    ///
    /// Returns `None` for a zero vector.
    pub fn closest_to(v: Vec2) -> Option<Self> {
        if v.length_squared() <= f32::EPSILON {
            return None;
        }
        let mut best = Direction::Up;
        let mut best_dot = f32::MIN;
        for dir in Direction::ALL {
            let dot = dir.dot(v);
            if dot > best_dot {
                best_dot = dot;
                best = dir;
            }
        }
        Some(best)
    }

    fn bit(self) -> u8 {
        match self {
            Direction::Up => 0b0001,
            Direction::Right => 0b0010,
            Direction::Down => 0b0100,
            Direction::Left => 0b1000,
        }
    }
}

/// Set of cardinal directions, enumerated in `Direction::ALL` order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirectionSet(u8);

impl DirectionSet {
    pub const EMPTY: DirectionSet = DirectionSet(0);
    pub const ALL: DirectionSet = DirectionSet(0b1111);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= dir.bit();
    }

    pub fn remove(&mut self, dir: Direction) {
        self.0 &= !dir.bit();
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Copy of this set without `dir`
    pub fn without(mut self, dir: Direction) -> Self {
        self.remove(dir);
        self
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.contains(*d))
    }
}

impl FromIterator<Direction> for DirectionSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut set = DirectionSet::new();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl<const N: usize> From<[Direction; N]> for DirectionSet {
    fn from(dirs: [Direction; N]) -> Self {
        dirs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_are_symmetric() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
            assert!((dir.vector() + dir.opposite().vector()).length() < 1e-6);
        }
    }

    #[test]
    fn test_closest_to_picks_dominant_axis() {
        assert_eq!(Direction::closest_to(Vec2::new(0.2, 0.9)), Some(Direction::Up));
        assert_eq!(Direction::closest_to(Vec2::new(-3.0, 1.0)), Some(Direction::Left));
        assert_eq!(Direction::closest_to(Vec2::ZERO), None);
    }

    #[test]
    fn test_closest_to_diagonal_tie_prefers_canonical_order() {
        // Up and Right align equally; Up comes first.
        assert_eq!(Direction::closest_to(Vec2::new(1.0, 1.0)), Some(Direction::Up));
        // Right and Down align equally; Right comes first.
        assert_eq!(Direction::closest_to(Vec2::new(1.0, -1.0)), Some(Direction::Right));
    }

    #[test]
    fn test_direction_set_iterates_in_canonical_order() {
        let set = DirectionSet::from([Direction::Left, Direction::Up, Direction::Down]);
        let dirs: Vec<_> = set.iter().collect();
        assert_eq!(dirs, vec![Direction::Up, Direction::Down, Direction::Left]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_direction_set_has_no_duplicates() {
        let mut set = DirectionSet::new();
        set.insert(Direction::Right);
        set.insert(Direction::Right);
        assert_eq!(set.len(), 1);
        assert!(set.without(Direction::Right).is_empty());
    }
}
