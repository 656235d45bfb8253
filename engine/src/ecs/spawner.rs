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

//! Entity spawner
//!
//! Turns content definitions into entities: creates the base component set
//! through the registry, attaches the side tables the role calls for, and
//! announces the new entity on the event bus.

use crate::config::AiConfig;
use crate::ecs::components::{
    AIController, Combatant, EntityId, Experience, Interactable, Inventory, LootTable, Movement,
    Pickup, Role, Route, Stats, StatusEffects,
};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::{EntityRegistry, SpawnState};
use crate::error::SimError;
use dataevolved_common::{EntityDefinition, ItemDefinition, SpawnRequest};
use hecs::EntityBuilder;

/// Creates entities from definitions using configured AI defaults
#[derive(Debug, Clone, Copy)]
pub struct EntitySpawner {
    config: AiConfig,
}

impl EntitySpawner {
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    /// Spawn an entity of `role` at `(x, y)`
    pub fn spawn(
        &self,
        registry: &mut EntityRegistry,
        event_bus: &EventBus,
        role: Role,
        x: f32,
        y: f32,
        definition: &EntityDefinition,
        now_ms: f64,
    ) -> Result<EntityId, SimError> {
        let state = SpawnState::new(definition.name.clone(), x, y, Stats::from(definition.stats));
        let id = registry.create(role, state);

        let mut builder = self.side_tables(role, definition);
        registry.attach(id, builder.build())?;

        tracing::debug!("Spawned {} '{}' at ({}, {})", role, definition.name, x, y);
        event_bus.emit(GameEvent::EntitySpawned { entity: id, role }, now_ms, "spawner");
        Ok(id)
    }

    /// Spawn from a content request, rejecting unknown roles
    pub fn spawn_request(
        &self,
        registry: &mut EntityRegistry,
        event_bus: &EventBus,
        request: &SpawnRequest,
        now_ms: f64,
    ) -> Result<EntityId, SimError> {
        let role: Role = request.role.parse()?;
        self.spawn(
            registry,
            event_bus,
            role,
            request.x,
            request.y,
            &request.definition,
            now_ms,
        )
    }

    fn side_tables(&self, role: Role, definition: &EntityDefinition) -> EntityBuilder {
        let mut builder = EntityBuilder::new();
        let fights = matches!(role, Role::Player | Role::NpcAi | Role::EnemyAi);

        if definition.speed > 0.0 {
            builder.add(Movement::new(definition.speed));
        }

        if fights {
            builder.add(StatusEffects::new());
            if let Some(attack) = &definition.attack {
                let cooldown = attack.cooldown_ms.unwrap_or(self.config.attack_cooldown_ms);
                builder.add(
                    Combatant::new(attack.range, cooldown.max(0.0)).with_on_hit(attack.on_hit.clone()),
                );
            }
        }

        match role {
            Role::Player => {
                builder.add(Inventory::default());
                builder.add(Experience::default());
            }
            Role::NpcAi | Role::EnemyAi => {
                if let Some(aggro) = &definition.aggro {
                    let multiplier = aggro
                        .loss_multiplier
                        .unwrap_or(self.config.aggro_loss_multiplier);
                    builder.add(AIController::new(aggro.aggro_range, multiplier));
                    if definition.speed > 0.0 {
                        builder.add(Route::default());
                    }
                }
            }
            Role::WorldObject => {
                builder.add(Interactable {
                    enabled: definition.interactive,
                });
            }
            Role::Item => {
                let item = definition
                    .item
                    .clone()
                    .unwrap_or_else(|| ItemDefinition::new(definition.name.clone(), 1));
                builder.add(Pickup { item });
            }
        }

        if role != Role::Item && (!definition.loot.is_empty() || definition.experience > 0) {
            builder.add(LootTable {
                entries: definition.loot.clone(),
                experience: definition.experience,
            });
        }

        builder
    }
}

impl Default for EntitySpawner {
    fn default() -> Self {
        Self::new(AiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::events::EventType;
    use dataevolved_common::{LootEntry, StatBlock};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_spawn_enemy_with_side_tables() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let spawned = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&spawned);
        bus.subscribe(EventType::EntitySpawned, move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        let definition = EntityDefinition::named("Glitch")
            .with_stats(StatBlock {
                power: 20,
                max_power: 20,
                ..StatBlock::default()
            })
            .with_speed(48.0)
            .with_attack(16.0, None)
            .with_aggro(96.0);

        let spawner = EntitySpawner::default();
        let id = spawner
            .spawn(&mut registry, &bus, Role::EnemyAi, 32.0, 32.0, &definition, 0.0)
            .unwrap();

        assert_eq!(spawned.load(Ordering::SeqCst), 1);
        assert_eq!(registry.get(id).unwrap().stats.power(), 20);
        assert_eq!(registry.component::<Movement>(id).unwrap().speed, 48.0);
        assert_eq!(registry.component::<Combatant>(id).unwrap().cooldown_ms, 1000.0);
        assert_eq!(registry.component::<AIController>(id).unwrap().loss_range(), 144.0);
        assert!(registry.component::<Route>(id).is_some());
        assert!(registry.component::<Inventory>(id).is_none());
    }

    #[test]
    fn test_spawn_player_and_item() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let spawner = EntitySpawner::default();

        let player = spawner
            .spawn(&mut registry, &bus, Role::Player, 0.0, 0.0, &EntityDefinition::named("Ada"), 0.0)
            .unwrap();
        assert!(registry.component::<Inventory>(player).is_some());
        assert!(registry.component::<Experience>(player).is_some());
        assert!(registry.component::<Combatant>(player).is_none());

        let item = spawner
            .spawn(&mut registry, &bus, Role::Item, 0.0, 0.0, &EntityDefinition::named("shard"), 0.0)
            .unwrap();
        assert_eq!(registry.component::<Pickup>(item).unwrap().item.item_id, "shard");
    }

    #[test]
    fn test_loot_table_attached_when_defined() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let mut definition = EntityDefinition::named("Crawler");
        definition.experience = 25;
        definition.loot.push(LootEntry {
            item: ItemDefinition::new("shard", 1),
            chance: 1.0,
        });

        let id = EntitySpawner::default()
            .spawn(&mut registry, &bus, Role::EnemyAi, 0.0, 0.0, &definition, 0.0)
            .unwrap();
        let loot = registry.component::<LootTable>(id).unwrap();
        assert_eq!(loot.experience, 25);
        assert_eq!(loot.entries.len(), 1);
    }

    #[test]
    fn test_zero_power_spawn_is_not_alive() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let definition = EntityDefinition::named("Husk")
            .with_stats(StatBlock {
                power: 0,
                max_power: 10,
                ..StatBlock::default()
            })
            .with_aggro(64.0);

        let spawner = EntitySpawner::default();
        let husk = spawner
            .spawn(&mut registry, &bus, Role::EnemyAi, 0.0, 0.0, &definition, 0.0)
            .unwrap();
        let living = spawner
            .spawn(&mut registry, &bus, Role::EnemyAi, 16.0, 0.0, &EntityDefinition::named("Glitch"), 0.0)
            .unwrap();

        assert!(!registry.get(husk).unwrap().is_alive());
        assert!(!registry.is_alive(husk));

        let mut visited = Vec::new();
        registry.for_each_alive(|id, _, _, _| visited.push(id));
        assert_eq!(visited, vec![living]);
    }

    #[test]
    fn test_unknown_role_request_is_rejected() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let request = SpawnRequest {
            role: "dragon".into(),
            x: 0.0,
            y: 0.0,
            definition: EntityDefinition::default(),
        };

        let result = EntitySpawner::default().spawn_request(&mut registry, &bus, &request, 0.0);
        assert!(matches!(result, Err(SimError::UnknownRole(_))));
        assert!(registry.is_empty());
    }
}
