//! Direction scoring for waypoint decisions
//!
//! Pure functions over positions and weights. The engine gathers the
//! inputs; nothing here touches agent state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::types::{Direction, DirectionSet};
use crate::sensing::forage::Consumable;
use crate::sensing::threat::toward_threat;

/// Weights for the waypoint scoring heuristic
///
/// Reference ordering: revisit > food ≈ target > threat > continue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Food alignment bonus, summed over items in the forward cone
    pub food: f32,
    /// Direct pull toward the selected forage target
    pub target: f32,
    /// Penalty for heading toward the predator while foraging
    pub threat: f32,
    /// Bonus for keeping the current heading
    pub continue_straight: f32,
    /// Penalty for a direction leading back to a recently visited node
    pub revisit: f32,
    /// Penalty for repeating the direction last chosen at this node
    pub repeat: f32,
    /// Penalty for heading toward the predator while panicking
    pub flee_threat: f32,
    /// Revisit penalty applied while panicking (0 disables)
    pub flee_revisit: f32,
    /// Cosine of the half-angle of the food cone
    pub food_cone_cos: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            food: 10.0,
            target: 5.0,
            threat: 0.5,
            continue_straight: 0.3,
            revisit: 100.0,
            repeat: 0.2,
            flee_threat: 3.0,
            flee_revisit: 0.75,
            food_cone_cos: 0.5,
        }
    }
}

impl ScoringWeights {
    /// Whether the weights keep the reference priority ordering
    pub fn has_reference_ordering(&self) -> bool {
        self.revisit > self.food.max(self.target)
            && self.food.min(self.target) > self.threat
            && self.threat > self.continue_straight
    }
}

/// Score of one candidate direction, kept for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    pub direction: Direction,
    pub score: f32,
}

/// Everything the forage scorer reads for one decision
#[derive(Debug, Clone, Copy)]
pub struct ForageInputs<'a> {
    pub node_pos: Vec2,
    pub agent_pos: Vec2,
    pub heading: Option<Direction>,
    pub items: &'a [Consumable],
    pub search_radius: f32,
    pub target: Option<Vec2>,
    pub threat: Option<Vec2>,
    /// Directions whose neighbor node is in the revisit history
    pub revisits: DirectionSet,
    /// Direction chosen last time at this node
    pub memo: Option<Direction>,
}

/// Alignment-weighted count of active food ahead of `from` along `dir`
///
/// Items count only inside the cone and the search radius; each
/// contributes its alignment times a linear distance falloff.
pub fn food_alignment_bonus(
    dir: Direction,
    from: Vec2,
    items: &[Consumable],
    search_radius: f32,
    cone_cos: f32,
) -> f32 {
    items
        .iter()
        .filter(|item| item.active)
        .filter_map(|item| {
            let offset = item.position - from;
            let distance = offset.length();
            let alignment = dir.dot(offset.normalize_or_zero());
            (alignment > cone_cos && distance < search_radius)
                .then(|| alignment * (1.0 - distance / search_radius))
        })
        .sum()
}

/// Alignment of `dir` with the threat, clamped at zero
pub fn threat_alignment(dir: Direction, agent_pos: Vec2, threat: Option<Vec2>) -> f32 {
    threat
        .map(|t| dir.dot(toward_threat(agent_pos, t)).max(0.0))
        .unwrap_or(0.0)
}

/// Score a candidate while foraging
pub fn forage_score(dir: Direction, inputs: &ForageInputs, weights: &ScoringWeights) -> f32 {
    let mut score = 0.0;

    if inputs.revisits.contains(dir) {
        score -= weights.revisit;
    }

    score += weights.food
        * food_alignment_bonus(
            dir,
            inputs.node_pos,
            inputs.items,
            inputs.search_radius,
            weights.food_cone_cos,
        );

    if let Some(target) = inputs.target {
        score += weights.target * dir.dot((target - inputs.node_pos).normalize_or_zero());
    }

    score -= weights.threat * threat_alignment(dir, inputs.agent_pos, inputs.threat);

    if inputs.heading == Some(dir) {
        score += weights.continue_straight;
    }

    if inputs.memo == Some(dir) {
        score -= weights.repeat;
    }

    score
}

/// Score a candidate while panicking
pub fn flee_score(
    dir: Direction,
    flee: Vec2,
    agent_pos: Vec2,
    threat: Option<Vec2>,
    revisit: bool,
    weights: &ScoringWeights,
) -> f32 {
    let mut score = dir.dot(flee);
    score -= weights.flee_threat * threat_alignment(dir, agent_pos, threat);
    if revisit {
        score -= weights.flee_revisit;
    }
    score
}

/// Score every candidate and pick the maximum
///
/// Candidates are visited in canonical direction order and only a strictly
/// greater score replaces the leader, so ties go to the earliest direction.
pub fn pick_best(
    candidates: DirectionSet,
    mut score: impl FnMut(Direction) -> f32,
) -> Option<(Direction, Vec<CandidateScore>)> {
    let scores: Vec<CandidateScore> = candidates
        .iter()
        .map(|direction| CandidateScore {
            direction,
            score: score(direction),
        })
        .collect();

    let mut best: Option<CandidateScore> = None;
    for candidate in &scores {
        match best {
            Some(b) if candidate.score <= b.score => {}
            _ => best = Some(*candidate),
        }
    }
    best.map(|b| (b.direction, scores))
}

/// Cardinal best aligned with `flee`, avoiding blocked directions
///
/// Returns the ideal cardinal if open, otherwise the best-aligned open
/// cardinal, otherwise `None` (every direction blocked).
pub fn best_flee_cardinal(flee: Vec2, is_blocked: impl Fn(Direction) -> bool) -> Option<Direction> {
    let ideal = Direction::closest_to(flee).unwrap_or(Direction::Up);
    if !is_blocked(ideal) {
        return Some(ideal);
    }
    let open: DirectionSet = Direction::ALL.into_iter().filter(|d| !is_blocked(*d)).collect();
    pick_best(open, |d| d.dot(flee)).map(|(d, _)| d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(items: &'a [Consumable]) -> ForageInputs<'a> {
        ForageInputs {
            node_pos: Vec2::ZERO,
            agent_pos: Vec2::ZERO,
            heading: Some(Direction::Right),
            items,
            search_radius: 15.0,
            target: None,
            threat: None,
            revisits: DirectionSet::EMPTY,
            memo: None,
        }
    }

    #[test]
    fn test_default_weights_follow_reference_ordering() {
        assert!(ScoringWeights::default().has_reference_ordering());
        let inverted = ScoringWeights {
            threat: 20.0,
            ..ScoringWeights::default()
        };
        assert!(!inverted.has_reference_ordering());
    }

    #[test]
    fn test_food_bonus_counts_only_cone_and_radius() {
        let items = vec![
            Consumable::new(0, Vec2::new(0.0, 5.0), 10),   // straight ahead
            Consumable::new(1, Vec2::new(5.0, 5.0), 10),   // 45 degrees, inside cone
            Consumable::new(2, Vec2::new(5.0, 1.0), 10),   // outside cone
            Consumable::new(3, Vec2::new(0.0, 30.0), 10),  // beyond radius
        ];
        let bonus = food_alignment_bonus(Direction::Up, Vec2::ZERO, &items, 15.0, 0.5);

        let ahead = 1.0 * (1.0 - 5.0 / 15.0);
        let diag_dist = 50f32.sqrt();
        let diagonal = std::f32::consts::FRAC_1_SQRT_2 * (1.0 - diag_dist / 15.0);
        assert!((bonus - (ahead + diagonal)).abs() < 1e-5);
    }

    #[test]
    fn test_food_bonus_ignores_inactive_and_colocated_items() {
        let mut items = vec![
            Consumable::new(0, Vec2::new(0.0, 5.0), 10),
            Consumable::new(1, Vec2::ZERO, 10),
        ];
        items[0].active = false;
        assert_eq!(food_alignment_bonus(Direction::Up, Vec2::ZERO, &items, 15.0, 0.5), 0.0);
    }

    #[test]
    fn test_threat_penalty_only_when_facing_threat() {
        let threat = Some(Vec2::new(4.0, 0.0));
        assert!((threat_alignment(Direction::Right, Vec2::ZERO, threat) - 1.0).abs() < 1e-6);
        assert_eq!(threat_alignment(Direction::Left, Vec2::ZERO, threat), 0.0);
        assert_eq!(threat_alignment(Direction::Up, Vec2::ZERO, threat), 0.0);
        assert_eq!(threat_alignment(Direction::Right, Vec2::ZERO, None), 0.0);
    }

    #[test]
    fn test_item_above_beats_going_straight() {
        let items = vec![Consumable::new(0, Vec2::new(0.0, 5.0), 10)];
        let mut input = inputs(&items);
        input.target = Some(Vec2::new(0.0, 5.0));
        let weights = ScoringWeights::default();

        let candidates = DirectionSet::from([Direction::Up, Direction::Right]);
        let (best, scores) = pick_best(candidates, |d| forage_score(d, &input, &weights)).unwrap();

        assert_eq!(best, Direction::Up);
        assert_eq!(scores.len(), 2);
        let right = scores.iter().find(|s| s.direction == Direction::Right).unwrap();
        assert!((right.score - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_revisit_penalty_dominates_food() {
        let items = vec![Consumable::new(0, Vec2::new(0.0, 2.0), 10)];
        let mut input = inputs(&items);
        input.target = Some(Vec2::new(0.0, 2.0));
        input.revisits = DirectionSet::from([Direction::Up]);
        let weights = ScoringWeights::default();

        let candidates = DirectionSet::from([Direction::Up, Direction::Right]);
        let (best, _) = pick_best(candidates, |d| forage_score(d, &input, &weights)).unwrap();
        assert_eq!(best, Direction::Right);
    }

    #[test]
    fn test_ties_resolve_to_canonical_order() {
        let candidates = DirectionSet::from([Direction::Left, Direction::Down, Direction::Right]);
        let (best, _) = pick_best(candidates, |_| 1.0).unwrap();
        assert_eq!(best, Direction::Right);
        assert!(pick_best(DirectionSet::EMPTY, |_| 1.0).is_none());
    }

    #[test]
    fn test_flee_score_prefers_away_and_penalizes_toward() {
        let weights = ScoringWeights::default();
        let agent = Vec2::ZERO;
        let threat = Vec2::new(3.0, 0.0);
        let flee = (agent - threat).normalize();

        let away = flee_score(Direction::Left, flee, agent, Some(threat), false, &weights);
        let side = flee_score(Direction::Up, flee, agent, Some(threat), false, &weights);
        let toward = flee_score(Direction::Right, flee, agent, Some(threat), false, &weights);
        assert!(away > side && side > toward);
        assert!((toward - (-1.0 - 3.0)).abs() < 1e-6);

        let away_revisit = flee_score(Direction::Left, flee, agent, Some(threat), true, &weights);
        assert!(away_revisit > side, "fleeing still beats a sideways step");
    }

    #[test]
    fn test_best_flee_cardinal_falls_back_when_blocked() {
        let flee = Vec2::new(-1.0, 0.4).normalize();
        assert_eq!(best_flee_cardinal(flee, |_| false), Some(Direction::Left));
        assert_eq!(
            best_flee_cardinal(flee, |d| d == Direction::Left),
            Some(Direction::Up)
        );
        assert_eq!(best_flee_cardinal(flee, |_| true), None);
    }
}
