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

//! Test utilities for ECS testing

use crate::ecs::components::{EntityId, Role, Stats};
use crate::ecs::registry::{EntityRegistry, SpawnState};
use crate::ecs::systems::{SimTime, System, SystemContext};
use crate::error::SystemError;
use crate::pathfinding::TileGrid;
use dataevolved_common::InputSnapshot;

/// Tile edge length used by test grids
pub const TILE: f32 = 16.0;

/// Create a test registry
pub fn create_test_registry() -> EntityRegistry {
    EntityRegistry::new()
}

/// Create an all-walkable grid of 16x16 tiles
pub fn open_grid(width: usize, height: usize) -> TileGrid {
    TileGrid::new(width, height, TILE, TILE)
}

/// Spawn a test entity with only the base components
pub fn spawn_test_entity(registry: &mut EntityRegistry, role: Role, x: f32, y: f32, power: u32) -> EntityId {
    let stats = Stats::new(power, power).with_combat(10, 0);
    registry.create(role, SpawnState::new(format!("{} {}", role, registry.len()), x, y, stats))
}

/// Run one update of a system with a 10ms step
pub fn run_system<S: System>(
    system: &mut S,
    registry: &mut EntityRegistry,
    grid: &TileGrid,
    input: &InputSnapshot,
    now_ms: f64,
) -> Result<(), SystemError> {
    let mut ctx = SystemContext {
        registry,
        grid,
        input,
        time: SimTime {
            now_ms,
            step_ms: 10.0,
            tick: (now_ms / 10.0) as u64,
        },
    };
    system.update(&mut ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_registry() {
        let registry = create_test_registry();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_spawn_entity() {
        let mut registry = create_test_registry();
        let id = spawn_test_entity(&mut registry, Role::EnemyAi, 8.0, 8.0, 30);

        let snapshot = registry.get(id).unwrap();
        assert_eq!(snapshot.stats.power(), 30);
        assert_eq!(snapshot.stats.ghz, 10);
        assert!(open_grid(2, 2).is_walkable_world(snapshot.position.point()));
    }
}
