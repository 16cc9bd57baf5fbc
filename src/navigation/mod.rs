//! Waypoint navigation graph

pub mod graph;
pub mod spatial_index;

pub use graph::{WaypointGraph, WaypointNode};
pub use spatial_index::SparseNodeIndex;
