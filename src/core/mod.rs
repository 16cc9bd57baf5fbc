pub mod config;
pub mod error;
pub mod types;

pub use config::ChaseConfig;
pub use error::{ChaseError, Result};
pub use types::{AgentId, ConsumableId, Direction, DirectionSet, NodeId, Tick};
