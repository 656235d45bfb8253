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

//! World bounds system: removes entities that stray off the map

use super::{System, SystemContext};
use crate::config::WorldConfig;
use crate::ecs::DespawnReason;
use crate::ecs::components::{EntityId, EntityUuid, Position};
use crate::error::SystemError;
use hecs::Entity;

/// Marks entities outside the grid extent (plus a margin) for removal
pub struct WorldBoundsSystem {
    margin_tiles: f32,
}

impl WorldBoundsSystem {
    /// Create a new world bounds system
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            margin_tiles: config.bounds_margin.max(0.0),
        }
    }
}

impl System for WorldBoundsSystem {
    fn name(&self) -> &'static str {
        "world_bounds"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let (min, max) = ctx.grid.world_extent();
        let margin_x = self.margin_tiles * ctx.grid.tile_width();
        let margin_y = self.margin_tiles * ctx.grid.tile_height();

        let strays: Vec<EntityId> = {
            let registry = &*ctx.registry;
            let mut query = registry.world().query::<(Entity, &EntityUuid, &Position)>();
            query
                .iter()
                .filter(|(entity, _, position)| {
                    !registry.is_pending_removal(*entity)
                        && !(position.x >= min.x - margin_x
                            && position.x <= max.x + margin_x
                            && position.y >= min.y - margin_y
                            && position.y <= max.y + margin_y)
                })
                .map(|(entity, uuid, _)| uuid.id(entity))
                .collect()
        };

        for id in strays {
            tracing::debug!("Entity {} left the world bounds", id);
            ctx.registry.destroy(id, DespawnReason::OutOfBounds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::Role;
    use crate::ecs::test_utils::{create_test_registry, open_grid, run_system, spawn_test_entity};
    use dataevolved_common::InputSnapshot;

    #[test]
    fn test_strays_are_removed_with_reason() {
        let mut registry = create_test_registry();
        let grid = open_grid(4, 4);
        let inside = spawn_test_entity(&mut registry, Role::EnemyAi, 8.0, 8.0, 10);
        let in_margin = spawn_test_entity(&mut registry, Role::EnemyAi, -20.0, 8.0, 10);
        let outside = spawn_test_entity(&mut registry, Role::EnemyAi, 8.0, 200.0, 10);
        let lost = spawn_test_entity(&mut registry, Role::Item, f32::NAN, 8.0, 1);

        let mut system = WorldBoundsSystem::new(&WorldConfig::default());
        run_system(&mut system, &mut registry, &grid, &InputSnapshot::default(), 0.0).unwrap();

        let removed = registry.flush();
        assert_eq!(removed.len(), 2);
        assert!(removed.contains(&(outside, DespawnReason::OutOfBounds)));
        assert!(removed.contains(&(lost, DespawnReason::OutOfBounds)));
        assert!(registry.contains(inside));
        assert!(registry.contains(in_margin));
    }
}
