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

//! Grid pathfinding service
//!
//! Stateless A* search over a 4-connected walkable/non-walkable tile grid.
//! Every call allocates its own open and closed sets, so searches are
//! reentrant and may run for different requests concurrently.

mod astar;
mod grid;

pub use astar::{Path, PathError, Waypoint, find_grid_path, find_path};
pub use grid::{GridPos, TileGrid, WorldPoint};
