//! Fixed-step chase simulation: world, predator control and tick loop

pub mod layout;
pub mod predator;
pub mod tick;
pub mod world;

pub use layout::{GridLayout, DEMO_LAYOUT};
pub use predator::{Predator, PredatorScript, ScriptedCommand};
pub use tick::{run_simulation_tick, run_ticks, SimulationEvent};
pub use world::ChaseWorld;
