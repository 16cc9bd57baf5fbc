//! Obstacle layer and the short box probe used before committing a turn
//!
//! Obstacles are static blocked grid cells. Queries are synchronous and
//! never mutate the layer.

use ahash::AHashSet;
use glam::Vec2;

/// Boundary slack so boxes that merely touch a cell edge do not hit it
const TOUCH_EPSILON: f32 = 1e-4;

/// Anything that can answer "would a box swept this way hit an obstacle?"
pub trait ObstacleProbe {
    /// Sweep an axis-aligned box of `size` centred on `center` by `distance`
    /// along `dir`. Returns true if the swept volume hits an obstacle.
    fn box_cast(&self, center: Vec2, size: Vec2, dir: Vec2, distance: f32) -> bool;
}

/// Probe for levels without obstacles
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl ObstacleProbe for OpenField {
    fn box_cast(&self, _center: Vec2, _size: Vec2, _dir: Vec2, _distance: f32) -> bool {
        false
    }
}

/// Set of blocked grid cells
#[derive(Debug, Clone)]
pub struct ObstacleLayer {
    cells: AHashSet<(i32, i32)>,
    cell_size: f32,
}

impl ObstacleLayer {
    /// Create an empty layer with a cell size of 1.0
    pub fn new() -> Self {
        Self::with_cell_size(1.0)
    }

    pub fn with_cell_size(cell_size: f32) -> Self {
        Self {
            cells: AHashSet::new(),
            cell_size,
        }
    }

    /// Block a cell at grid coordinates
    pub fn block(&mut self, x: i32, y: i32) {
        self.cells.insert((x, y));
    }

    pub fn unblock(&mut self, x: i32, y: i32) {
        self.cells.remove(&(x, y));
    }

    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        self.cells.contains(&(x, y))
    }

    /// Check if a world position lies in a blocked cell
    pub fn is_position_blocked(&self, pos: Vec2) -> bool {
        let (cx, cy) = self.world_to_cell(pos);
        self.is_blocked(cx, cy)
    }

    /// Convert world position to cell coordinates
    pub fn world_to_cell(&self, pos: Vec2) -> (i32, i32) {
        let x = (pos.x / self.cell_size).floor() as i32;
        let y = (pos.y / self.cell_size).floor() as i32;
        (x, y)
    }

    /// True if any blocked cell overlaps the open box `[min, max]`
    pub fn box_overlaps(&self, min: Vec2, max: Vec2) -> bool {
        let start_x = ((min.x + TOUCH_EPSILON) / self.cell_size).floor() as i32;
        let start_y = ((min.y + TOUCH_EPSILON) / self.cell_size).floor() as i32;
        let end_x = ((max.x - TOUCH_EPSILON) / self.cell_size).floor() as i32;
        let end_y = ((max.y - TOUCH_EPSILON) / self.cell_size).floor() as i32;

        for cy in start_y..=end_y {
            for cx in start_x..=end_x {
                if self.is_blocked(cx, cy) {
                    return true;
                }
            }
        }
        false
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Default for ObstacleLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl ObstacleProbe for ObstacleLayer {
    fn box_cast(&self, center: Vec2, size: Vec2, dir: Vec2, distance: f32) -> bool {
        let half = size * 0.5;
        let end = center + dir * distance;
        let min = (center - half).min(end - half);
        let max = (center + half).max(end + half);
        self.box_overlaps(min, max)
    }
}
