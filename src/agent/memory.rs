//! Bounded anti-oscillation memory
//!
//! Both structures are capped so a long-lived agent never grows them.

use std::collections::VecDeque;

use glam::Vec2;

use crate::core::types::{Direction, NodeId};

/// Ring buffer of the last N visited waypoint positions
#[derive(Debug, Clone)]
pub struct RecentNodes {
    capacity: usize,
    positions: VecDeque<Vec2>,
}

impl RecentNodes {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            positions: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Remember a node, evicting the oldest beyond capacity
    pub fn push(&mut self, position: Vec2) {
        self.positions.push_back(position);
        while self.positions.len() > self.capacity {
            self.positions.pop_front();
        }
    }

    /// True if any remembered position lies within `tolerance` of `position`
    pub fn contains(&self, position: Vec2, tolerance: f32) -> bool {
        self.positions
            .iter()
            .any(|p| p.distance(position) < tolerance)
    }

    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Last direction chosen at each node, capped with FIFO eviction
#[derive(Debug, Clone)]
pub struct DirectionMemo {
    capacity: usize,
    entries: VecDeque<(NodeId, Direction)>,
}

impl DirectionMemo {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, node: NodeId, dir: Direction) {
        if self.capacity == 0 {
            return;
        }
        self.entries.retain(|(n, _)| *n != node);
        self.entries.push_back((node, dir));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn get(&self, node: NodeId) -> Option<Direction> {
        self.entries
            .iter()
            .find(|(n, _)| *n == node)
            .map(|(_, d)| *d)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_nodes_keeps_last_n() {
        let mut recent = RecentNodes::new(3);
        for x in 0..5 {
            recent.push(Vec2::new(x as f32 * 2.0, 0.0));
        }
        let kept: Vec<_> = recent.iter().map(|p| p.x).collect();
        assert_eq!(kept, vec![4.0, 6.0, 8.0]);
        assert!(!recent.contains(Vec2::ZERO, 0.5));
        assert!(recent.contains(Vec2::new(6.2, 0.1), 0.5));
    }

    #[test]
    fn test_memo_overwrites_and_evicts() {
        let mut memo = DirectionMemo::new(2);
        memo.record(NodeId(1), Direction::Up);
        memo.record(NodeId(1), Direction::Left);
        assert_eq!(memo.get(NodeId(1)), Some(Direction::Left));
        assert_eq!(memo.len(), 1);

        memo.record(NodeId(2), Direction::Down);
        memo.record(NodeId(3), Direction::Right);
        assert_eq!(memo.get(NodeId(1)), None);
        assert_eq!(memo.get(NodeId(3)), Some(Direction::Right));
        assert_eq!(memo.len(), 2);
    }

    #[test]
    fn test_zero_capacity_memo_stays_empty() {
        let mut memo = DirectionMemo::new(0);
        memo.record(NodeId(1), Direction::Up);
        assert!(memo.is_empty());
    }
}
