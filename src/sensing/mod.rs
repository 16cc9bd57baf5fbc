//! Threat and forage sensing

pub mod forage;
pub mod threat;

pub use forage::{nearest, nearest_consumable, Consumable, ForageSource, ForageTracker};
pub use threat::{distance_to_threat, is_threat_near, ThreatReading, ThreatSource};
