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

//! Pathfinding integration tests

use dataevolved_common::MapData;
use dataevolved_engine::pathfinding::{GridPos, PathError, TileGrid, WorldPoint, find_grid_path, find_path};

fn centre(grid: &TileGrid, x: i32, y: i32) -> WorldPoint {
    grid.grid_to_world(GridPos::new(x, y))
}

#[test]
fn test_open_grid_diagonal_path() {
    let grid = TileGrid::new(10, 10, 16.0, 16.0);
    let path = find_path(centre(&grid, 1, 1), centre(&grid, 8, 8), &grid).unwrap();

    assert_eq!(path.waypoints().first().unwrap().cell, GridPos::new(1, 1));
    assert_eq!(path.waypoints().last().unwrap().cell, GridPos::new(8, 8));
    assert_eq!(path.cost(), 14);
    assert_eq!(path.len(), 15);

    for pair in path.waypoints().windows(2) {
        assert!(pair[1].g_cost > pair[0].g_cost);
        assert_eq!(pair[0].cell.manhattan(pair[1].cell), 1);
        assert!(grid.is_walkable(pair[1].cell));
    }
}

#[test]
fn test_straight_line_cost_matches_distance() {
    let grid = TileGrid::new(12, 3, 16.0, 16.0);
    for n in 0..12 {
        let path = find_grid_path(GridPos::new(0, 0), GridPos::new(n, 0), &grid).unwrap();
        assert_eq!(path.len(), n as usize + 1);
        assert_eq!(path.cost(), n as u32);
    }
}

#[test]
fn test_path_routes_through_single_gap() {
    let map = MapData::from_rows(
        16.0,
        16.0,
        &[
            "..........",
            "..........",
            "#########.",
            "..........",
            "..........",
        ],
    );
    let grid = TileGrid::from_map(&map).unwrap();
    let path = find_grid_path(GridPos::new(0, 0), GridPos::new(0, 4), &grid).unwrap();

    assert!(path.cells().any(|cell| cell == GridPos::new(9, 2)));
    assert!(path.cells().all(|cell| grid.is_walkable(cell)));
    assert_eq!(path.cost(), 22);
}

#[test]
fn test_walled_off_goal_is_unreachable() {
    let map = MapData::from_rows(16.0, 16.0, &["..#..", "..#..", "..#.."]);
    let grid = TileGrid::from_map(&map).unwrap();

    let result = find_grid_path(GridPos::new(0, 1), GridPos::new(4, 1), &grid);
    assert_eq!(
        result,
        Err(PathError::Unreachable {
            from: GridPos::new(0, 1),
            to: GridPos::new(4, 1),
        })
    );
}

#[test]
fn test_out_of_bounds_endpoints() {
    let grid = TileGrid::new(4, 4, 16.0, 16.0);

    let start = find_path(WorldPoint::new(-20.0, 8.0), WorldPoint::new(8.0, 8.0), &grid);
    assert!(matches!(start, Err(PathError::StartOutOfBounds(_))));

    let goal = find_path(WorldPoint::new(8.0, 8.0), WorldPoint::new(8.0, 400.0), &grid);
    assert!(matches!(goal, Err(PathError::GoalOutOfBounds(_))));
}

#[test]
fn test_start_equals_goal() {
    let grid = TileGrid::new(4, 4, 16.0, 16.0);
    let path = find_path(WorldPoint::new(20.0, 20.0), WorldPoint::new(30.0, 30.0), &grid).unwrap();

    assert_eq!(path.len(), 1);
    assert_eq!(path.cost(), 0);
    assert_eq!(path.points().next(), Some(WorldPoint::new(24.0, 24.0)));
}
