//! Agent decision engine
//!
//! Per tick and per agent, in this order:
//! threat/forage refresh -> state transition -> waypoint decision -> motion.
//!
//! The engine holds only configuration. Everything it reads from the world
//! arrives through a `DecisionContext`, so agents never reach for globals.

use glam::Vec2;
use serde::Serialize;

use crate::agent::scoring::{
    best_flee_cardinal, flee_score, forage_score, pick_best, CandidateScore, ForageInputs,
    ScoringWeights,
};
use crate::agent::{Agent, AgentState};
use crate::core::config::{AgentConfig, ChaseConfig};
use crate::core::error::Result;
use crate::core::types::{ConsumableId, Direction, DirectionSet, NodeId};
use crate::motion::controller::TurnOutcome;
use crate::motion::modifiers::ModifierId;
use crate::motion::obstacles::ObstacleProbe;
use crate::navigation::graph::{WaypointGraph, WaypointNode};
use crate::sensing::forage::{Consumable, ForageSource};
use crate::sensing::threat::{flee_vector, ThreatReading, ThreatSource};

/// What one agent sees of the shared world this tick
#[derive(Clone, Copy)]
pub struct DecisionContext<'a> {
    pub graph: &'a WaypointGraph,
    pub obstacles: &'a dyn ObstacleProbe,
    /// Predator position, `None` when absent
    pub threat: Option<Vec2>,
    pub items: &'a [Consumable],
}

impl<'a> DecisionContext<'a> {
    pub fn new<T, F>(
        graph: &'a WaypointGraph,
        obstacles: &'a dyn ObstacleProbe,
        threat: &T,
        forage: &'a F,
    ) -> Self
    where
        T: ThreatSource + ?Sized,
        F: ForageSource + ?Sized,
    {
        Self {
            graph,
            obstacles,
            threat: threat.threat_position(),
            items: forage.consumables(),
        }
    }
}

/// Observable outcome of one engine step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AgentEvent {
    PanicStarted {
        threat_distance: f32,
        /// Flee direction taken on entry, `None` if boxed in
        direction: Option<Direction>,
    },
    Calmed,
    DirectionChosen {
        node: NodeId,
        direction: Direction,
        /// False when the obstacle probe queued the turn as pending
        committed: bool,
        scores: Vec<CandidateScore>,
    },
    DeadEnd {
        node: NodeId,
    },
    ForageTargetChanged {
        target: Option<ConsumableId>,
    },
    SpeedModifierExpired {
        modifier: ModifierId,
    },
}

/// Finite-state controller shared by every prey agent
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: AgentConfig,
    weights: ScoringWeights,
}

impl DecisionEngine {
    /// Build an engine from a validated configuration
    pub fn new(config: &ChaseConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.agent.clone(),
            weights: config.weights.clone(),
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Advance one agent by `dt` seconds
    pub fn step(&self, agent: &mut Agent, ctx: &DecisionContext, dt: f32) -> Vec<AgentEvent> {
        let mut events = Vec::new();
        let position = agent.position();

        // 1. Sensing
        let reading = ThreatReading::sense(position, ctx.threat, self.config.detection_range);
        let threat_near = reading.is_some_and(|r| r.near);

        if agent.state == AgentState::Foraging {
            if let Some(target) = agent.forage.update(
                position,
                ctx.items,
                self.config.food_search_radius,
                self.config.forage_refresh_interval,
                dt,
            ) {
                events.push(AgentEvent::ForageTargetChanged { target });
            }
        }

        // 2. State transitions
        match (agent.state, reading) {
            (AgentState::Foraging, Some(threat)) if threat.near => {
                let direction = self.enter_panic(agent, ctx, threat);
                events.push(AgentEvent::PanicStarted {
                    threat_distance: threat.distance,
                    direction,
                });
            }
            (AgentState::Panicking, _) if threat_near => {
                agent.panic_timer = self.config.panic_duration;
            }
            (AgentState::Panicking, _) => {
                agent.panic_timer -= dt;
                if agent.panic_timer <= 0.0 {
                    self.calm(agent);
                    events.push(AgentEvent::Calmed);
                }
            }
            _ => {}
        }

        // 3. Waypoint decision
        self.decide(agent, ctx, &mut events);

        // 4. Motion
        if agent.motion.retry_pending(ctx.obstacles) {
            align_at_node(agent, ctx.graph);
        }
        for modifier in agent.motion.update_modifiers(dt) {
            events.push(AgentEvent::SpeedModifierExpired { modifier });
        }
        agent.motion.tick(dt);

        events
    }

    fn enter_panic(
        &self,
        agent: &mut Agent,
        ctx: &DecisionContext,
        threat: ThreatReading,
    ) -> Option<Direction> {
        agent.state = AgentState::Panicking;
        agent.panic_timer = self.config.panic_duration;
        agent.motion.set_base_multiplier(self.config.panic_speed);
        agent.recent.clear();
        // The flip below drops any queued turn, so the node just decided at
        // must be decidable again.
        agent.last_decision = None;

        let flee = flee_vector(agent.position(), threat.position);
        let direction = best_flee_cardinal(flee, |d| agent.motion.is_occupied(d, ctx.obstacles));
        if let Some(dir) = direction {
            if agent.motion.set_direction(dir, false, ctx.obstacles) == TurnOutcome::Committed {
                align_at_node(agent, ctx.graph);
            }
        }

        tracing::info!(
            "Agent {:?} panicking: threat at {:.2}, fleeing {:?}",
            agent.id(),
            threat.distance,
            direction
        );
        direction
    }

    fn calm(&self, agent: &mut Agent) {
        agent.state = AgentState::Foraging;
        agent.panic_timer = 0.0;
        agent.motion.set_base_multiplier(self.config.normal_speed);
        agent.forage.clear();
        tracing::info!("Agent {:?} calmed down", agent.id());
    }

    /// Pick and commit a direction if the agent is at a fresh waypoint
    fn decide(&self, agent: &mut Agent, ctx: &DecisionContext, events: &mut Vec<AgentEvent>) {
        let position = agent.position();
        let Some(node) = ctx.graph.node_at(position) else {
            return;
        };
        if let Some(last) = agent.last_decision {
            if position.distance(last) <= self.config.decision_displacement {
                return;
            }
        }
        // Zero-direction nodes were reported when the graph was built.
        if node.directions.is_empty() {
            return;
        }

        let heading = agent.motion.heading();
        let mut candidates = match (agent.state, heading) {
            (AgentState::Foraging, Some(h)) => node.directions.without(h.opposite()),
            _ => node.directions,
        };
        if candidates.is_empty() {
            candidates = node.directions;
            agent.recent.clear();
            events.push(AgentEvent::DeadEnd { node: node.id });
            tracing::debug!("Agent {:?} reversing at dead end {:?}", agent.id(), node.id);
        }

        let revisits = self.revisit_set(agent, ctx.graph, node, candidates);
        let best = match (agent.state, ctx.threat) {
            (AgentState::Panicking, Some(threat)) => {
                let flee = flee_vector(position, threat);
                pick_best(candidates, |d| {
                    flee_score(
                        d,
                        flee,
                        position,
                        Some(threat),
                        revisits.contains(d),
                        &self.weights,
                    )
                })
            }
            _ => {
                let inputs = ForageInputs {
                    node_pos: node.position,
                    agent_pos: position,
                    heading,
                    items: ctx.items,
                    search_radius: self.config.food_search_radius,
                    target: agent.forage.target_position(ctx.items),
                    threat: ctx.threat,
                    revisits,
                    memo: agent.memo.get(node.id),
                };
                pick_best(candidates, |d| forage_score(d, &inputs, &self.weights))
            }
        };
        let Some((direction, scores)) = best else {
            return;
        };

        let outcome = agent.motion.set_direction(direction, false, ctx.obstacles);
        if outcome == TurnOutcome::Committed {
            agent.motion.align_to_lane(node.position);
        }
        agent.recent.push(node.position);
        agent.memo.record(node.id, direction);
        agent.last_decision = Some(node.position);

        tracing::debug!(
            "Agent {:?} at {:?} ({:?}) chose {:?} ({:?}) from {:?}",
            agent.id(),
            node.id,
            agent.state,
            direction,
            outcome,
            scores
        );
        events.push(AgentEvent::DirectionChosen {
            node: node.id,
            direction,
            committed: outcome == TurnOutcome::Committed,
            scores,
        });
    }

    /// Candidates whose neighbor node is in the agent's recent history
    fn revisit_set(
        &self,
        agent: &Agent,
        graph: &WaypointGraph,
        node: &WaypointNode,
        candidates: DirectionSet,
    ) -> DirectionSet {
        candidates
            .iter()
            .filter(|d| {
                graph.neighbor(node.id, *d).is_some_and(|n| {
                    agent
                        .recent
                        .contains(n.position, self.config.revisit_tolerance)
                })
            })
            .collect()
    }
}

/// Keep a turn that just committed on the lane of the node it was taken at
fn align_at_node(agent: &mut Agent, graph: &WaypointGraph) {
    if let Some(node) = graph.node_at(agent.position()) {
        agent.motion.align_to_lane(node.position);
    }
}
