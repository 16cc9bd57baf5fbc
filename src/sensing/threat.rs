//! Threat proximity sensing
//!
//! Stateless: every reading is a pure function of the two positions.

use glam::Vec2;

/// Source of the predator position
///
/// `None` means the predator is absent (not spawned or removed); all
/// threat-dependent behavior then evaluates to zero.
pub trait ThreatSource {
    fn threat_position(&self) -> Option<Vec2>;
}

impl ThreatSource for Option<Vec2> {
    fn threat_position(&self) -> Option<Vec2> {
        *self
    }
}

impl ThreatSource for Vec2 {
    fn threat_position(&self) -> Option<Vec2> {
        Some(*self)
    }
}

pub fn distance_to_threat(agent_pos: Vec2, threat_pos: Vec2) -> f32 {
    agent_pos.distance(threat_pos)
}

/// Euclidean distance within `range` (inclusive)
pub fn is_threat_near(agent_pos: Vec2, threat_pos: Vec2, range: f32) -> bool {
    distance_to_threat(agent_pos, threat_pos) <= range
}

/// What an agent perceives of the threat this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreatReading {
    pub position: Vec2,
    pub distance: f32,
    pub near: bool,
}

impl ThreatReading {
    pub fn sense(agent_pos: Vec2, threat_pos: Option<Vec2>, range: f32) -> Option<Self> {
        let position = threat_pos?;
        Some(Self {
            position,
            distance: distance_to_threat(agent_pos, position),
            near: is_threat_near(agent_pos, position, range),
        })
    }
}

/// Unit vector pointing from the threat to the agent (zero if co-located)
pub fn flee_vector(agent_pos: Vec2, threat_pos: Vec2) -> Vec2 {
    (agent_pos - threat_pos).normalize_or_zero()
}

/// Unit vector pointing from the agent to the threat (zero if co-located)
pub fn toward_threat(agent_pos: Vec2, threat_pos: Vec2) -> Vec2 {
    (threat_pos - agent_pos).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive() {
        let agent = Vec2::ZERO;
        assert!(is_threat_near(agent, Vec2::new(5.0, 0.0), 5.0));
        assert!(is_threat_near(agent, Vec2::new(4.9, 0.0), 5.0));
        assert!(!is_threat_near(agent, Vec2::new(5.1, 0.0), 5.0));
    }

    #[test]
    fn test_sense_without_threat_is_none() {
        assert!(ThreatReading::sense(Vec2::ZERO, None, 5.0).is_none());
        let reading = ThreatReading::sense(Vec2::ZERO, Some(Vec2::new(3.0, 4.0)), 5.0).unwrap();
        assert_eq!(reading.distance, 5.0);
        assert!(reading.near);
    }

    #[test]
    fn test_flee_vector_points_away() {
        let flee = flee_vector(Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0));
        assert!((flee - Vec2::NEG_X).length() < 1e-6);
        assert_eq!(flee_vector(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
    }
}
