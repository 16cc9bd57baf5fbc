//! Pasture Chase - waypoint-graph foraging and evasion AI
//!
//! Prey agents roam a graph of waypoints, forage for items and flee a
//! single predator. Each agent is a two-state machine (foraging, panicking)
//! that scores candidate directions at waypoints and moves continuously in
//! between.

pub mod agent;
pub mod core;
pub mod motion;
pub mod navigation;
pub mod sensing;
pub mod simulation;
