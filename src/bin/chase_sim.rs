//! Headless Chase Runner
//!
//! Runs the demo maze with a scripted predator and reports what the prey
//! did. Optionally writes the full event log as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use pasture_chase::agent::AgentEvent;
use pasture_chase::core::{ChaseConfig, Direction, Result};
use pasture_chase::simulation::{
    run_simulation_tick, ChaseWorld, GridLayout, PredatorScript, ScriptedCommand,
    SimulationEvent, DEMO_LAYOUT,
};
use serde::Serialize;

/// Headless Chase Runner - prey AI against a scripted predator
#[derive(Parser, Debug)]
#[command(name = "chase_sim")]
#[command(about = "Run the chase simulation headless and summarize the prey behavior")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of fixed simulation ticks to run
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// Seed for initial headings, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Write every simulation event to this JSON file
    #[arg(long)]
    events: Option<PathBuf>,

    /// Run without a predator (pure foraging)
    #[arg(long)]
    no_predator: bool,

    /// Stop once every item has been eaten
    #[arg(long)]
    stop_when_cleared: bool,
}

/// Summary printed at the end of a run
#[derive(Serialize, Debug, Default)]
struct RunSummary {
    ticks: u64,
    seed: u64,
    score: u32,
    items_left: usize,
    agents_caught: usize,
    decisions: usize,
    deferred_turns: usize,
    dead_ends: usize,
    panics: usize,
}

/// One lap of the demo maze for the predator, starting at its spawn
///
/// Times assume the default speed of 4 units per second.
const PATROL_LAP: [(f32, Direction); 9] = [
    (0.0, Direction::Left),
    (1.0, Direction::Down),
    (1.5, Direction::Left),
    (2.0, Direction::Down),
    (2.5, Direction::Right),
    (4.0, Direction::Down),
    (5.0, Direction::Left),
    (7.0, Direction::Up),
    (9.0, Direction::Right),
];
const PATROL_LAP_SECONDS: f32 = 11.0;

fn patrol_script(duration: f32, speed: f32) -> PredatorScript {
    let time_scale = 4.0 / speed;
    let lap = PATROL_LAP_SECONDS * time_scale;
    let laps = (duration / lap).ceil().max(1.0) as usize;

    let commands = (0..laps)
        .flat_map(|n| {
            PATROL_LAP.iter().map(move |(at, direction)| ScriptedCommand {
                at: n as f32 * lap + at * time_scale,
                direction: *direction,
            })
        })
        .collect();
    PredatorScript::new(commands)
}

fn summarize(summary: &mut RunSummary, events: &[SimulationEvent]) {
    for event in events {
        match event {
            SimulationEvent::Agent { event, .. } => match event {
                AgentEvent::DirectionChosen { committed, .. } => {
                    summary.decisions += 1;
                    if !committed {
                        summary.deferred_turns += 1;
                    }
                }
                AgentEvent::DeadEnd { .. } => summary.dead_ends += 1,
                AgentEvent::PanicStarted { .. } => summary.panics += 1,
                _ => {}
            },
            SimulationEvent::AgentCaught { .. } => summary.agents_caught += 1,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pasture_chase=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ChaseConfig::load(path)?,
        None => ChaseConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }

    let layout = GridLayout::parse(DEMO_LAYOUT)?;
    let mut world = ChaseWorld::from_layout(config, &layout)?;
    if args.no_predator {
        world.predator = None;
    } else {
        let duration = args.ticks as f32 * world.config.simulation.fixed_dt;
        world.set_predator_script(patrol_script(duration, world.config.motion.speed));
    }

    for problem in world.diagnostics() {
        tracing::warn!("{}", problem);
    }

    tracing::info!("Running {} ticks (seed {})", args.ticks, world.config.simulation.seed);

    let start = Instant::now();
    let mut log = Vec::new();
    let mut summary = RunSummary {
        seed: world.config.simulation.seed,
        ..RunSummary::default()
    };

    for _ in 0..args.ticks {
        let events = run_simulation_tick(&mut world);
        summarize(&mut summary, &events);
        let cleared = events
            .iter()
            .any(|e| matches!(e, SimulationEvent::ItemsCleared { .. }));
        if args.events.is_some() {
            log.extend(events);
        }
        if world.free_agents() == 0 || (args.stop_when_cleared && cleared) {
            break;
        }
    }
    let elapsed = start.elapsed();

    summary.ticks = world.current_tick;
    summary.score = world.score;
    summary.items_left = world.active_items();

    println!("Chase Result");
    println!("============");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    println!("Actual time: {:.2}ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = &args.events {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, &log)?;
        println!("Event log ({} events) written to {}", log.len(), path.display());
    }

    Ok(())
}
