//! Decision engine integration tests: waypoint scoring scenarios,
//! panic transitions and obstacle handling through the public API

use glam::Vec2;
use pasture_chase::agent::{Agent, AgentEvent, AgentState, DecisionContext, DecisionEngine};
use pasture_chase::core::{AgentId, ChaseConfig, Direction, DirectionSet};
use pasture_chase::motion::{ObstacleLayer, OpenField, TurnOutcome};
use pasture_chase::navigation::WaypointGraph;
use pasture_chase::sensing::Consumable;

const DT: f32 = 1.0 / 60.0;

fn chosen(events: &[AgentEvent]) -> Vec<Direction> {
    events
        .iter()
        .filter_map(|e| match e {
            AgentEvent::DirectionChosen { direction, .. } => Some(*direction),
            _ => None,
        })
        .collect()
}

#[test]
fn test_agent_turns_toward_item_at_junction() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    let graph = WaypointGraph::new(
        0.4,
        vec![(Vec2::ZERO, DirectionSet::from([Direction::Up, Direction::Right]))],
    );
    let items = vec![Consumable::new(0, Vec2::new(0.0, 5.0), 10)];
    let ctx = DecisionContext::new(&graph, &OpenField, &None::<Vec2>, &items);
    let mut agent = Agent::new(AgentId(0), Vec2::ZERO, Some(Direction::Right), &config);

    let events = engine.step(&mut agent, &ctx, DT);

    assert_eq!(chosen(&events), vec![Direction::Up]);
    assert_eq!(agent.direction(), Some(Direction::Up));
    assert_eq!(agent.last_decision(), Some(Vec2::ZERO));
}

#[test]
fn test_threat_at_4_9_panics_and_flips_mid_edge() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    let graph = WaypointGraph::new(0.4, vec![(Vec2::ZERO, DirectionSet::ALL)]);
    let items: Vec<Consumable> = Vec::new();

    // Agent mid-edge heading up, predator 4.9 units above.
    let start = Vec2::new(10.0, 2.0);
    let threat = start + Vec2::new(0.0, 4.9);
    let ctx = DecisionContext::new(&graph, &OpenField, &threat, &items);
    let mut agent = Agent::new(AgentId(3), start, Some(Direction::Up), &config);

    let events = engine.step(&mut agent, &ctx, DT);

    assert_eq!(agent.state(), AgentState::Panicking);
    assert_eq!(agent.speed_multiplier(), 2.0);
    assert_eq!(agent.direction(), Some(Direction::Down));
    assert!(chosen(&events).is_empty(), "flip happens without a waypoint");

    // Movement this tick already uses the panic speed.
    let expected = start + Vec2::NEG_Y * config.motion.speed * 2.0 * DT;
    assert!((agent.position() - expected).length() < 1e-5);
}

#[test]
fn test_threat_just_outside_range_is_ignored() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    let graph = WaypointGraph::new(0.4, vec![(Vec2::ZERO, DirectionSet::ALL)]);
    let items: Vec<Consumable> = Vec::new();
    let start = Vec2::new(10.0, 2.0);
    let threat = start + Vec2::new(5.1, 0.0);
    let ctx = DecisionContext::new(&graph, &OpenField, &threat, &items);
    let mut agent = Agent::new(AgentId(0), start, Some(Direction::Right), &config);

    engine.step(&mut agent, &ctx, DT);

    assert_eq!(agent.state(), AgentState::Foraging);
    assert_eq!(agent.direction(), Some(Direction::Right));
}

#[test]
fn test_dead_end_forces_reversal_and_clears_history() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    let graph = WaypointGraph::new(
        0.4,
        vec![
            (Vec2::ZERO, DirectionSet::from([Direction::Right])),
            (Vec2::new(4.0, 0.0), DirectionSet::from([Direction::Left])),
        ],
    );
    let items: Vec<Consumable> = Vec::new();
    let ctx = DecisionContext::new(&graph, &OpenField, &None::<Vec2>, &items);
    let mut agent = Agent::new(AgentId(0), Vec2::ZERO, Some(Direction::Right), &config);

    // Decide at the left end, then travel to the right dead end.
    let mut events = engine.step(&mut agent, &ctx, DT);
    for _ in 0..90 {
        events.extend(engine.step(&mut agent, &ctx, DT));
        if agent.direction() == Some(Direction::Left) {
            break;
        }
    }

    assert!(events.iter().any(|e| matches!(e, AgentEvent::DeadEnd { .. })));
    assert_eq!(agent.direction(), Some(Direction::Left));
    let history: Vec<Vec2> = agent.recent_nodes().iter().collect();
    assert_eq!(history, vec![Vec2::new(4.0, 0.0)]);
}

#[test]
fn test_history_breaks_two_node_shuttle_while_fleeing() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    let a = Vec2::ZERO;
    let b = Vec2::new(4.0, 0.0);
    let graph = WaypointGraph::new(
        0.4,
        vec![
            (a, DirectionSet::from([Direction::Up, Direction::Right])),
            (b, DirectionSet::from([Direction::Up, Direction::Left])),
            (Vec2::new(0.0, 4.0), DirectionSet::from([Direction::Down])),
            (Vec2::new(4.0, 4.0), DirectionSet::from([Direction::Down])),
        ],
    );
    let items: Vec<Consumable> = Vec::new();

    // The predator jumps to the far side after each decision, chasing the
    // agent back and forth along A-B. Before the fourth decision it sits
    // off-axis, where going back to A still scores best on flee alignment.
    let threats = [
        Vec2::new(-3.0, 0.0),
        Vec2::new(7.0, 0.0),
        Vec2::new(-3.0, 0.0),
        Vec2::new(6.0, -1.0),
    ];

    let mut agent = Agent::new(AgentId(0), a, Some(Direction::Left), &config);
    let mut decisions: Vec<(Vec2, Direction)> = Vec::new();
    for _ in 0..300 {
        let threat = threats[decisions.len()];
        let ctx = DecisionContext::new(&graph, &OpenField, &threat, &items);
        let at = agent.position();
        for direction in chosen(&engine.step(&mut agent, &ctx, DT)) {
            let node = graph.node_at(at).map(|n| n.position);
            decisions.push((node.unwrap_or(at), direction));
        }
        if decisions.len() == threats.len() {
            break;
        }
        assert!(agent.is_panicking());
    }

    assert_eq!(
        decisions,
        vec![
            (a, Direction::Right),
            (b, Direction::Left),
            (a, Direction::Right),
            (b, Direction::Up),
        ]
    );

    // Without the history, the same predator position sends the agent back to A.
    let ctx = DecisionContext::new(&graph, &OpenField, &threats[3], &items);
    let mut fresh = Agent::new(AgentId(1), b, Some(Direction::Right), &config);
    assert_eq!(chosen(&engine.step(&mut fresh, &ctx, DT)), vec![Direction::Left]);
}

#[test]
fn test_unforced_turn_respects_obstacles() {
    let config = ChaseConfig::default();
    let mut walls = ObstacleLayer::new();
    walls.block(0, 1);
    let mut agent = Agent::new(AgentId(0), Vec2::new(0.5, 0.5), Some(Direction::Right), &config);

    assert!(agent.motion.is_occupied(Direction::Up, &walls));
    assert_eq!(
        agent.motion.set_direction(Direction::Up, false, &walls),
        TurnOutcome::Deferred
    );
    assert_eq!(agent.direction(), Some(Direction::Right));

    assert_eq!(
        agent.motion.set_direction(Direction::Up, true, &walls),
        TurnOutcome::Committed
    );
    assert_eq!(agent.direction(), Some(Direction::Up));
}

#[test]
fn test_deferred_decision_commits_once_aligned() {
    let config = ChaseConfig::default();
    let engine = DecisionEngine::new(&config).unwrap();
    // Corner at cell (2, 0): corridor from the left, opening upward.
    let mut walls = ObstacleLayer::new();
    for x in 0..4 {
        walls.block(x, -1);
    }
    walls.block(0, 1);
    walls.block(1, 1);
    walls.block(3, 1);
    walls.block(3, 0);
    let corner = Vec2::new(2.5, 0.5);
    let graph = WaypointGraph::new(
        0.4,
        vec![(corner, DirectionSet::from([Direction::Up, Direction::Left]))],
    );
    let items: Vec<Consumable> = Vec::new();
    let ctx = DecisionContext::new(&graph, &walls, &None::<Vec2>, &items);

    let mut agent = Agent::new(AgentId(0), Vec2::new(1.9, 0.5), Some(Direction::Right), &config);
    let mut deferred = false;
    for _ in 0..30 {
        for event in engine.step(&mut agent, &ctx, DT) {
            if let AgentEvent::DirectionChosen { committed: false, direction, .. } = event {
                assert_eq!(direction, Direction::Up);
                deferred = true;
            }
        }
        if agent.direction() == Some(Direction::Up) {
            break;
        }
    }

    assert!(deferred, "turn was requested before the agent was aligned");
    assert_eq!(agent.direction(), Some(Direction::Up));
    assert!((agent.position().x - corner.x).abs() < 1e-5);
}
