//! Continuous motion, obstacle probing and speed modifiers

pub mod controller;
pub mod modifiers;
pub mod obstacles;

pub use controller::{MotionController, TurnOutcome};
pub use modifiers::{ModifierId, SpeedModifiers};
pub use obstacles::{ObstacleLayer, ObstacleProbe, OpenField};
