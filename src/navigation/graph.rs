//! Waypoint graph: discrete decision points and their traversable directions
//!
//! Built once from static level data and immutable afterwards. A position
//! that matches no node is the normal "mid-edge" case, not an error.

use glam::Vec2;

use crate::core::error::ChaseError;
use crate::core::types::{Direction, DirectionSet, NodeId};
use crate::navigation::spatial_index::SparseNodeIndex;

/// A decision point in the level graph
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointNode {
    pub id: NodeId,
    pub position: Vec2,
    pub directions: DirectionSet,
}

/// Static waypoint graph with position lookup
#[derive(Debug, Clone)]
pub struct WaypointGraph {
    nodes: Vec<WaypointNode>,
    /// Node reached by travelling one edge in each direction, indexed by
    /// `Direction::ALL` position
    neighbors: Vec<[Option<NodeId>; 4]>,
    index: SparseNodeIndex,
    capture_radius: f32,
}

impl WaypointGraph {
    /// Build a graph from node positions and their traversable directions
    ///
    /// Node ids are assigned in input order. Malformed input is logged once
    /// here and otherwise tolerated.
    pub fn new(capture_radius: f32, nodes: impl IntoIterator<Item = (Vec2, DirectionSet)>) -> Self {
        let nodes: Vec<WaypointNode> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, (position, directions))| WaypointNode {
                id: NodeId(i as u32),
                position,
                directions,
            })
            .collect();

        let mut index = SparseNodeIndex::new(capture_radius.max(0.5));
        for node in &nodes {
            index.insert(node.id, node.position);
        }

        let neighbors = nodes
            .iter()
            .map(|node| link_neighbors(node, &nodes, capture_radius))
            .collect();

        let graph = Self {
            nodes,
            neighbors,
            index,
            capture_radius,
        };

        for problem in graph.diagnostics() {
            tracing::warn!("{}", problem);
        }

        graph
    }

    /// Node whose capture radius contains `pos`
    ///
    /// When capture areas overlap, the closest node wins; equal distances
    /// resolve to the lower node id.
    pub fn node_at(&self, pos: Vec2) -> Option<&WaypointNode> {
        self.index
            .query_neighbors(pos)
            .filter_map(|id| self.node(id))
            .map(|node| (node, node.position.distance(pos)))
            .filter(|(_, dist)| *dist <= self.capture_radius)
            .min_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)))
            .map(|(node, _)| node)
    }

    /// Precomputed traversable directions (empty for unknown ids)
    pub fn directions_at(&self, id: NodeId) -> DirectionSet {
        self.node(id).map(|n| n.directions).unwrap_or_default()
    }

    pub fn node(&self, id: NodeId) -> Option<&WaypointNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Node reached by following `dir` one edge from `id`
    pub fn neighbor(&self, id: NodeId, dir: Direction) -> Option<&WaypointNode> {
        let slot = direction_slot(dir);
        self.neighbors
            .get(id.0 as usize)
            .and_then(|links| links[slot])
            .and_then(|n| self.node(n))
    }

    pub fn nodes(&self) -> &[WaypointNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capture_radius(&self) -> f32 {
        self.capture_radius
    }

    /// Configuration problems in this graph
    pub fn diagnostics(&self) -> Vec<ChaseError> {
        if self.nodes.is_empty() {
            return vec![ChaseError::Configuration(
                "waypoint graph has no nodes".into(),
            )];
        }
        self.nodes
            .iter()
            .filter(|n| n.directions.is_empty())
            .map(|n| {
                ChaseError::Configuration(format!(
                    "node {:?} at ({:.2}, {:.2}) has no traversable directions",
                    n.id, n.position.x, n.position.y
                ))
            })
            .collect()
    }
}

fn direction_slot(dir: Direction) -> usize {
    match dir {
        Direction::Up => 0,
        Direction::Right => 1,
        Direction::Down => 2,
        Direction::Left => 3,
    }
}

/// Nearest node along each traversable direction, within a lateral band of
/// `lateral_tolerance`
fn link_neighbors(
    node: &WaypointNode,
    nodes: &[WaypointNode],
    lateral_tolerance: f32,
) -> [Option<NodeId>; 4] {
    let mut links = [None; 4];
    for dir in node.directions.iter() {
        let axis = dir.vector();
        links[direction_slot(dir)] = nodes
            .iter()
            .filter(|other| other.id != node.id)
            .filter_map(|other| {
                let offset = other.position - node.position;
                let along = offset.dot(axis);
                let lateral = offset.perp_dot(axis).abs();
                (along > f32::EPSILON && lateral <= lateral_tolerance)
                    .then_some((other.id, along))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
            .map(|(id, _)| id);
    }
    links
}
