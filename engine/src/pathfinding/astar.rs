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

//! A* search

use super::grid::{GridPos, TileGrid, WorldPoint};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use thiserror::Error;

/// Cost of moving between two orthogonally adjacent tiles
const STEP_COST: u32 = 1;

/// Why no path was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path start {0:?} lies outside the grid")]
    StartOutOfBounds(GridPos),

    #[error("Path goal {0:?} lies outside the grid")]
    GoalOutOfBounds(GridPos),

    #[error("No path from {from:?} to {to:?}")]
    Unreachable { from: GridPos, to: GridPos },
}

/// One step of a found path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub cell: GridPos,
    /// Centre of `cell` in world coordinates
    pub point: WorldPoint,
    /// Path cost from the start up to this waypoint
    pub g_cost: u32,
}

/// Ordered route from start cell to goal cell, both inclusive
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of cells on the path, including start and goal
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Total step cost of the path
    pub fn cost(&self) -> u32 {
        self.waypoints.last().map_or(0, |w| w.g_cost)
    }

    pub fn cells(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.waypoints.iter().map(|w| w.cell)
    }

    pub fn points(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        self.waypoints.iter().map(|w| w.point)
    }
}

/// Search node; lives only for the duration of one search
#[derive(Debug, Clone, Copy)]
struct PathNode {
    pos: GridPos,
    g_cost: u32,
    h_cost: u32,
    parent: Option<usize>,
}

impl PathNode {
    fn f_cost(&self) -> u32 {
        self.g_cost + self.h_cost
    }
}

/// Open-set entry ordered so the max-heap pops the lowest f, then the
/// lowest h, then the earliest pushed node
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f_cost: u32,
    h_cost: u32,
    sequence: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a path between two world points
///
/// Out-of-bounds endpoints fail immediately without searching.
pub fn find_path(start: WorldPoint, end: WorldPoint, grid: &TileGrid) -> Result<Path, PathError> {
    find_grid_path(grid.world_to_grid(start), grid.world_to_grid(end), grid)
}

/// Find a path between two grid cells
pub fn find_grid_path(start: GridPos, goal: GridPos, grid: &TileGrid) -> Result<Path, PathError> {
    if !grid.in_bounds(start) {
        return Err(PathError::StartOutOfBounds(start));
    }
    if !grid.in_bounds(goal) {
        return Err(PathError::GoalOutOfBounds(goal));
    }
    let unreachable = PathError::Unreachable {
        from: start,
        to: goal,
    };
    if !grid.is_walkable(goal) {
        return Err(unreachable);
    }

    let mut nodes = vec![PathNode {
        pos: start,
        g_cost: 0,
        h_cost: start.manhattan(goal),
        parent: None,
    }];
    let mut best_g: HashMap<GridPos, u32> = HashMap::from([(start, 0)]);
    let mut closed: HashSet<GridPos> = HashSet::new();
    let mut open = BinaryHeap::new();
    let mut sequence = 0_u64;
    open.push(OpenEntry {
        f_cost: nodes[0].f_cost(),
        h_cost: nodes[0].h_cost,
        sequence,
        node: 0,
    });

    while let Some(entry) = open.pop() {
        let current = nodes[entry.node];
        // Stale entry superseded by a cheaper route
        if closed.contains(&current.pos) {
            continue;
        }
        if current.pos == goal {
            return Ok(reconstruct(&nodes, entry.node, grid));
        }
        closed.insert(current.pos);

        for neighbor in current.pos.neighbors() {
            if !grid.is_walkable(neighbor) || closed.contains(&neighbor) {
                continue;
            }
            let g_cost = current.g_cost + STEP_COST;
            if best_g.get(&neighbor).is_some_and(|&known| g_cost >= known) {
                continue;
            }
            best_g.insert(neighbor, g_cost);

            let node = PathNode {
                pos: neighbor,
                g_cost,
                h_cost: neighbor.manhattan(goal),
                parent: Some(entry.node),
            };
            sequence += 1;
            open.push(OpenEntry {
                f_cost: node.f_cost(),
                h_cost: node.h_cost,
                sequence,
                node: nodes.len(),
            });
            nodes.push(node);
        }
    }

    tracing::trace!("Open set exhausted searching {:?} -> {:?}", start, goal);
    Err(unreachable)
}

fn reconstruct(nodes: &[PathNode], goal_index: usize, grid: &TileGrid) -> Path {
    let mut waypoints = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        let node = &nodes[index];
        waypoints.push(Waypoint {
            cell: node.pos,
            point: grid.grid_to_world(node.pos),
            g_cost: node.g_cost,
        });
        cursor = node.parent;
    }
    waypoints.reverse();
    Path { waypoints }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> TileGrid {
        let mut grid = TileGrid::new(rows[0].len(), rows.len(), 1.0, 1.0);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.set_walkable(GridPos::new(x as i32, y as i32), c != '#');
            }
        }
        grid
    }

    #[test]
    fn test_straight_line_on_open_grid() {
        let grid = TileGrid::new(12, 3, 1.0, 1.0);
        for n in 1..10 {
            let path = find_grid_path(GridPos::new(0, 0), GridPos::new(n, 0), &grid).unwrap();
            assert_eq!(path.len(), n as usize + 1);
            assert_eq!(path.cost(), n as u32);
        }
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = TileGrid::new(3, 3, 1.0, 1.0);
        let path = find_grid_path(GridPos::new(1, 1), GridPos::new(1, 1), &grid).unwrap();
        assert_eq!(path.len(), 1);
        assert_eq!(path.cost(), 0);
    }

    #[test]
    fn test_tie_break_prefers_lower_heuristic() {
        let grid = TileGrid::new(3, 3, 1.0, 1.0);
        let path = find_grid_path(GridPos::new(0, 0), GridPos::new(2, 2), &grid).unwrap();
        let cells: Vec<_> = path.cells().map(|c| (c.x, c.y)).collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]);
    }

    #[test]
    fn test_routes_around_wall() {
        let grid = grid_from(&[
            ".....",
            ".###.",
            "...#.",
            "####.",
            ".....",
        ]);
        let path = find_grid_path(GridPos::new(0, 2), GridPos::new(0, 4), &grid).unwrap();

        assert_eq!(path.cells().next(), Some(GridPos::new(0, 2)));
        assert_eq!(path.cells().last(), Some(GridPos::new(0, 4)));
        for cell in path.cells() {
            assert!(grid.is_walkable(cell));
        }
        // Consecutive waypoints are orthogonal neighbours
        for pair in path.waypoints().windows(2) {
            assert_eq!(pair[0].cell.manhattan(pair[1].cell), 1);
            assert_eq!(pair[1].g_cost, pair[0].g_cost + 1);
        }
        // Up and over the wall: 2 up, 4 right, 4 down, 4 left
        assert_eq!(path.cost(), 14);
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let grid = grid_from(&[
            ".....",
            ".###.",
            ".#.#.",
            ".###.",
            ".....",
        ]);
        let result = find_grid_path(GridPos::new(0, 0), GridPos::new(2, 2), &grid);
        assert_eq!(
            result,
            Err(PathError::Unreachable {
                from: GridPos::new(0, 0),
                to: GridPos::new(2, 2)
            })
        );
    }

    #[test]
    fn test_blocked_goal_is_unreachable() {
        let grid = grid_from(&["..#"]);
        let result = find_grid_path(GridPos::new(0, 0), GridPos::new(2, 0), &grid);
        assert!(matches!(result, Err(PathError::Unreachable { .. })));
    }

    #[test]
    fn test_out_of_bounds_fails_fast() {
        let grid = TileGrid::new(4, 4, 16.0, 16.0);

        let result = find_path(WorldPoint::new(-5.0, 8.0), WorldPoint::new(8.0, 8.0), &grid);
        assert_eq!(result, Err(PathError::StartOutOfBounds(GridPos::new(-1, 0))));

        let result = find_path(WorldPoint::new(8.0, 8.0), WorldPoint::new(8.0, 64.0), &grid);
        assert_eq!(result, Err(PathError::GoalOutOfBounds(GridPos::new(0, 4))));
    }

    #[test]
    fn test_world_points_are_tile_centres() {
        let grid = TileGrid::new(4, 1, 16.0, 16.0);
        let path = find_path(WorldPoint::new(1.0, 1.0), WorldPoint::new(60.0, 10.0), &grid).unwrap();
        let points: Vec<_> = path.points().collect();
        assert_eq!(points.first(), Some(&WorldPoint::new(8.0, 8.0)));
        assert_eq!(points.last(), Some(&WorldPoint::new(56.0, 8.0)));
    }
}
