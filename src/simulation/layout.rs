//! In-memory ASCII grid layouts for tests and the headless runner
//!
//! Legend: `#` wall, ` ` floor, `.` floor with an item, `S` agent spawn,
//! `W` predator spawn. Row 0 is the top line; world +y points up, so a
//! layout reads the same way it is drawn. Each character is one unit cell
//! and positions refer to cell centres.
//!
//! Lines are trimmed, so layouts should be walled in on every side.

use glam::Vec2;

use crate::core::error::{ChaseError, Result};
use crate::core::types::{Direction, DirectionSet};
use crate::motion::obstacles::ObstacleLayer;
use crate::navigation::graph::WaypointGraph;
use crate::sensing::forage::Consumable;

/// Points awarded per item placed by a layout
pub const ITEM_POINTS: u32 = 10;

/// Parsed grid layout
#[derive(Debug, Clone)]
pub struct GridLayout {
    width: usize,
    height: usize,
    open: Vec<Vec<bool>>,
    pub obstacles: ObstacleLayer,
    pub items: Vec<Vec2>,
    pub agent_spawns: Vec<Vec2>,
    pub predator_spawn: Option<Vec2>,
}

impl GridLayout {
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(ChaseError::InvalidParameter("layout has no rows".into()));
        }

        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

        let mut layout = Self {
            width,
            height,
            open: vec![vec![false; width]; height],
            obstacles: ObstacleLayer::new(),
            items: Vec::new(),
            agent_spawns: Vec::new(),
            predator_spawn: None,
        };

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let center = layout.cell_center(col, row);
                match ch {
                    '#' => {
                        let (x, y) = layout.cell_coords(col, row);
                        layout.obstacles.block(x, y);
                        continue;
                    }
                    ' ' => {}
                    '.' => layout.items.push(center),
                    'S' => layout.agent_spawns.push(center),
                    'W' => {
                        if layout.predator_spawn.replace(center).is_some() {
                            return Err(ChaseError::InvalidParameter(
                                "layout has more than one predator spawn".into(),
                            ));
                        }
                    }
                    other => {
                        return Err(ChaseError::InvalidParameter(format!(
                            "unknown layout character {:?} at row {}, column {}",
                            other, row, col
                        )));
                    }
                }
                layout.open[row][col] = true;
            }
        }

        Ok(layout)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Obstacle-grid coordinates of a layout cell
    pub fn cell_coords(&self, col: usize, row: usize) -> (i32, i32) {
        (col as i32, (self.height - 1 - row) as i32)
    }

    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        let (x, y) = self.cell_coords(col, row);
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
    }

    pub fn is_open(&self, col: usize, row: usize) -> bool {
        self.open
            .get(row)
            .and_then(|cells| cells.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Open neighbours of a cell; cells outside the layout count as walls
    pub fn open_directions(&self, col: usize, row: usize) -> DirectionSet {
        Direction::ALL
            .into_iter()
            .filter(|dir| {
                let (dc, dr) = match dir {
                    Direction::Up => (0, -1),
                    Direction::Right => (1, 0),
                    Direction::Down => (0, 1),
                    Direction::Left => (-1, 0),
                };
                let c = col as i64 + dc;
                let r = row as i64 + dr;
                c >= 0 && r >= 0 && self.is_open(c as usize, r as usize)
            })
            .collect()
    }

    /// Waypoints at every open cell that is not a straight corridor
    ///
    /// Junctions, corners and dead ends become nodes; spawn cells always do
    /// so agents get a first decision where they start.
    pub fn waypoints(&self) -> Vec<(Vec2, DirectionSet)> {
        let straight_h = DirectionSet::from([Direction::Left, Direction::Right]);
        let straight_v = DirectionSet::from([Direction::Up, Direction::Down]);

        let mut nodes = Vec::new();
        for row in 0..self.height {
            for col in 0..self.width {
                if !self.is_open(col, row) {
                    continue;
                }
                let center = self.cell_center(col, row);
                let dirs = self.open_directions(col, row);
                let corridor = dirs == straight_h || dirs == straight_v;
                if !corridor || self.agent_spawns.contains(&center) {
                    nodes.push((center, dirs));
                }
            }
        }
        nodes
    }

    pub fn graph(&self, capture_radius: f32) -> WaypointGraph {
        WaypointGraph::new(capture_radius, self.waypoints())
    }

    /// Fresh, active consumables for every item cell
    pub fn consumables(&self) -> Vec<Consumable> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, pos)| Consumable::new(i as u32, *pos, ITEM_POINTS))
            .collect()
    }
}

/// Small two-loop maze used by the headless runner and tests
pub const DEMO_LAYOUT: &str = r#"
    ###########
    #S . . . W#
    # ### ### #
    #.#  S  #.#
    # # ### # #
    #         #
    # # ### # #
    #.#  .  #.#
    # ### ### #
    #S . . . S#
    ###########
"#;
