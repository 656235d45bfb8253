//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Tile grid and world/grid coordinate conversion

use crate::error::SimError;
use dataevolved_common::MapData;
use dataevolved_common::map::BLOCKED_TILE;
use serde::{Deserialize, Serialize};

/// Integer tile coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the admissible heuristic for 4-connected movement
    pub fn manhattan(&self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonal neighbours in search order: north, east, south, west
    pub fn neighbors(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x - 1, self.y),
        ]
    }
}

impl From<(i32, i32)> for GridPos {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Real-valued world coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: WorldPoint) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f32, f32)> for WorldPoint {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Walkability grid produced from map data
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tile_width: f32,
    tile_height: f32,
    walkable: Vec<bool>,
}

impl TileGrid {
    /// Create a fully walkable grid
    pub fn new(width: usize, height: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            walkable: vec![true; width * height],
        }
    }

    /// Build a grid from ASCII map rows, `#` marking blocked tiles
    pub fn from_map(map: &MapData) -> Result<Self, SimError> {
        if map.rows.is_empty() || map.width() == 0 {
            return Err(SimError::InvalidMap("map has no tiles".to_string()));
        }
        if !(map.tile_width > 0.0 && map.tile_height > 0.0) {
            return Err(SimError::InvalidMap(format!(
                "tile dimensions must be positive, got {}x{}",
                map.tile_width, map.tile_height
            )));
        }

        let width = map.width();
        let mut grid = Self::new(width, map.height(), map.tile_width, map.tile_height);
        for (y, row) in map.rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(SimError::InvalidMap(format!(
                    "row {} has {} tiles, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            for (x, tile) in row.chars().enumerate() {
                grid.walkable[y * width + x] = tile != BLOCKED_TILE;
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if self.in_bounds(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds cells are never walkable
    pub fn is_walkable(&self, pos: GridPos) -> bool {
        self.index(pos).is_some_and(|i| self.walkable[i])
    }

    pub fn set_walkable(&mut self, pos: GridPos, walkable: bool) {
        if let Some(i) = self.index(pos) {
            self.walkable[i] = walkable;
        }
    }

    /// Tile containing a world point; may lie outside the grid
    pub fn world_to_grid(&self, point: WorldPoint) -> GridPos {
        if !point.x.is_finite() || !point.y.is_finite() {
            return GridPos::new(-1, -1);
        }
        GridPos::new(
            (point.x / self.tile_width).floor() as i32,
            (point.y / self.tile_height).floor() as i32,
        )
    }

    /// Centre of a tile in world coordinates
    pub fn grid_to_world(&self, pos: GridPos) -> WorldPoint {
        WorldPoint::new(
            (pos.x as f32 + 0.5) * self.tile_width,
            (pos.y as f32 + 0.5) * self.tile_height,
        )
    }

    pub fn is_walkable_world(&self, point: WorldPoint) -> bool {
        self.is_walkable(self.world_to_grid(point))
    }

    /// World-space extent of the grid as (min, max) corners
    pub fn world_extent(&self) -> (WorldPoint, WorldPoint) {
        (
            WorldPoint::new(0.0, 0.0),
            WorldPoint::new(
                self.width as f32 * self.tile_width,
                self.height as f32 * self.tile_height,
            ),
        )
    }
}
