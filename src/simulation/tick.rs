//! Tick system - orchestrates one fixed simulation step
//!
//! predator control -> per-agent decision engine -> item consumption ->
//! catch check
//!
//! Agents are processed in spawn order so runs are reproducible. They never
//! read each other's state, only the shared predator position and items.

use serde::Serialize;

use crate::agent::{AgentEvent, DecisionContext};
use crate::core::types::{AgentId, ConsumableId, Direction, Tick};
use crate::motion::controller::TurnOutcome;
use crate::sensing::threat::ThreatSource;
use crate::simulation::world::ChaseWorld;

/// Events generated during a simulation tick
///
/// Returned by `run_simulation_tick` so audio, UI and logging collaborators
/// can react without the core calling into them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum SimulationEvent {
    /// Something happened inside one agent's decision step
    Agent {
        tick: Tick,
        agent: AgentId,
        event: AgentEvent,
    },
    /// A scripted predator command was issued
    PredatorCommand {
        tick: Tick,
        direction: Direction,
        committed: bool,
    },
    ItemConsumed {
        tick: Tick,
        agent: AgentId,
        item: ConsumableId,
        points: u32,
    },
    /// The predator reached an agent
    AgentCaught { tick: Tick, agent: AgentId },
    /// Every item of the round has been eaten
    ItemsCleared { tick: Tick, score: u32 },
}

/// Run a single simulation tick of `config.simulation.fixed_dt` seconds
pub fn run_simulation_tick(world: &mut ChaseWorld) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let dt = world.config.simulation.fixed_dt;

    world.current_tick += 1;
    world.elapsed += dt;

    drive_predator(world, dt, &mut events);
    step_agents(world, dt, &mut events);
    consume_items(world, &mut events);
    check_catches(world, &mut events);

    events
}

/// Run `ticks` steps and collect every event
pub fn run_ticks(world: &mut ChaseWorld, ticks: u64) -> Vec<SimulationEvent> {
    (0..ticks).flat_map(|_| run_simulation_tick(world)).collect()
}

fn drive_predator(world: &mut ChaseWorld, dt: f32, events: &mut Vec<SimulationEvent>) {
    let Some(predator) = world.predator.as_mut() else {
        return;
    };

    if let Some(script) = world.script.as_mut() {
        for command in script.due(world.elapsed) {
            let outcome = predator.command(command.direction, &world.obstacles);
            events.push(SimulationEvent::PredatorCommand {
                tick: world.current_tick,
                direction: command.direction,
                committed: outcome == TurnOutcome::Committed,
            });
        }
    }

    predator.tick(&world.obstacles, dt);
}

fn step_agents(world: &mut ChaseWorld, dt: f32, events: &mut Vec<SimulationEvent>) {
    let ctx = DecisionContext::new(
        &world.graph,
        &world.obstacles,
        &world.predator,
        &world.consumables,
    );

    for agent in world
        .agents
        .iter_mut()
        .filter(|a| !world.caught.contains(&a.id()))
    {
        for event in world.engine.step(agent, &ctx, dt) {
            events.push(SimulationEvent::Agent {
                tick: world.current_tick,
                agent: agent.id(),
                event,
            });
        }
    }
}

fn consume_items(world: &mut ChaseWorld, events: &mut Vec<SimulationEvent>) {
    let radius = world.config.simulation.catch_radius;
    let had_items = world.active_items() > 0;

    for agent in world
        .agents
        .iter()
        .filter(|a| !world.caught.contains(&a.id()))
    {
        for item in world.consumables.iter_mut().filter(|c| c.active) {
            if agent.position().distance(item.position) <= radius {
                item.active = false;
                world.score += item.points;
                tracing::debug!("Agent {:?} ate item {:?}", agent.id(), item.id);
                events.push(SimulationEvent::ItemConsumed {
                    tick: world.current_tick,
                    agent: agent.id(),
                    item: item.id,
                    points: item.points,
                });
            }
        }
    }

    if had_items && world.active_items() == 0 {
        tracing::info!("All items consumed, score {}", world.score);
        events.push(SimulationEvent::ItemsCleared {
            tick: world.current_tick,
            score: world.score,
        });
    }
}

fn check_catches(world: &mut ChaseWorld, events: &mut Vec<SimulationEvent>) {
    let Some(threat) = world.predator.threat_position() else {
        return;
    };
    let radius = world.config.simulation.catch_radius;

    let newly_caught: Vec<AgentId> = world
        .agents
        .iter()
        .filter(|a| !world.caught.contains(&a.id()) && a.is_caught_by(threat, radius))
        .map(|a| a.id())
        .collect();

    for agent in newly_caught {
        world.caught.insert(agent);
        tracing::info!("Agent {:?} caught at tick {}", agent, world.current_tick);
        events.push(SimulationEvent::AgentCaught {
            tick: world.current_tick,
            agent,
        });
    }
}
