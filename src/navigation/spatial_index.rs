//! Sparse hash grid for waypoint lookup by position

use ahash::AHashMap;
use glam::Vec2;

use crate::core::types::NodeId;

/// Sparse hash grid mapping cells to the nodes whose position falls inside
///
/// A 3x3 neighborhood query covers any point within `cell_size` of the
/// query position, so the cell size must be at least the lookup radius.
#[derive(Debug, Clone)]
pub struct SparseNodeIndex {
    cell_size: f32,
    cells: AHashMap<(i32, i32), Vec<NodeId>>,
}

impl SparseNodeIndex {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(f32::EPSILON),
            cells: AHashMap::new(),
        }
    }

    #[inline]
    fn cell_coord(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, node: NodeId, pos: Vec2) {
        let coord = self.cell_coord(pos);
        self.cells.entry(coord).or_default().push(node);
    }

    /// All nodes in the 3x3 neighborhood of `pos`
    pub fn query_neighbors(&self, pos: Vec2) -> impl Iterator<Item = NodeId> + '_ {
        let (cx, cy) = self.cell_coord(pos);

        (-1..=1).flat_map(move |dx| {
            (-1..=1).flat_map(move |dy| {
                self.cells
                    .get(&(cx + dx, cy + dy))
                    .into_iter()
                    .flatten()
                    .copied()
            })
        })
    }

    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
