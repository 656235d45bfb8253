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

//! Death and loot system: drops loot, awards experience, removes the defeated

use super::{System, SystemContext};
use crate::config::AiConfig;
use crate::ecs::DespawnReason;
use crate::ecs::components::{EntityId, Experience, LootTable, Role};
use crate::ecs::events::{EventBus, EventType, GameEvent, SubscriptionId};
use crate::ecs::spawner::EntitySpawner;
use crate::error::SystemError;
use dataevolved_common::EntityDefinition;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

type DeathQueue = Arc<Mutex<VecDeque<(EntityId, Option<EntityId>)>>>;

/// Reacts to `EntityDied`
///
/// Deaths are queued by an event subscription and handled on the system's
/// next update: each loot entry is rolled with a seeded RNG and dropped as
/// an Item entity where the entity fell, the killer gains the table's
/// experience, and the defeated entity is marked for removal. Defeated
/// players stay in the world so the host can decide what happens next.
pub struct DeathLootSystem {
    event_bus: EventBus,
    spawner: EntitySpawner,
    rng: StdRng,
    deaths: DeathQueue,
    subscription: Option<SubscriptionId>,
}

impl DeathLootSystem {
    /// Create a new death and loot system
    pub fn new(event_bus: EventBus, config: &AiConfig) -> Self {
        Self {
            event_bus,
            spawner: EntitySpawner::new(*config),
            rng: StdRng::seed_from_u64(config.loot_seed),
            deaths: Arc::new(Mutex::new(VecDeque::new())),
            subscription: None,
        }
    }

    fn drop_loot(
        &mut self,
        ctx: &mut SystemContext<'_>,
        dead: EntityId,
        loot: &LootTable,
    ) -> Result<(), SystemError> {
        let Some(fallen) = ctx.registry.get(dead) else {
            return Ok(());
        };
        if let Some(entry) = loot.entries.iter().find(|e| !(0.0..=1.0).contains(&e.chance)) {
            return Err(SystemError::Failed(format!(
                "loot chance {} for '{}' is outside [0, 1]",
                entry.chance, entry.item.item_id
            )));
        }
        for entry in &loot.entries {
            if self.rng.random::<f64>() >= entry.chance {
                continue;
            }
            let definition = EntityDefinition {
                item: Some(entry.item.clone()),
                ..EntityDefinition::named(entry.item.item_id.clone())
            };
            let item = self.spawner.spawn(
                ctx.registry,
                &self.event_bus,
                Role::Item,
                fallen.position.x,
                fallen.position.y,
                &definition,
                ctx.time.now_ms,
            )?;
            self.event_bus.emit(
                GameEvent::ItemDropped {
                    item,
                    source: dead,
                    item_id: entry.item.item_id.clone(),
                },
                ctx.time.now_ms,
                "death_loot",
            );
        }
        Ok(())
    }

    fn award_experience(&self, ctx: &SystemContext<'_>, killer: EntityId, amount: u64) {
        if amount == 0 || !ctx.registry.contains(killer) {
            return;
        }
        let total = {
            let Some(mut experience) = ctx.registry.component_mut::<Experience>(killer) else {
                return;
            };
            experience.points = experience.points.saturating_add(amount);
            experience.points
        };
        self.event_bus.emit(
            GameEvent::ExperienceGained {
                entity: killer,
                amount,
                total,
            },
            ctx.time.now_ms,
            "death_loot",
        );
    }
}

impl System for DeathLootSystem {
    fn name(&self) -> &'static str {
        "death_loot"
    }

    fn init(&mut self) -> Result<(), SystemError> {
        let deaths = Arc::clone(&self.deaths);
        let id = self.event_bus.subscribe(EventType::EntityDied, move |event| {
            if let GameEvent::EntityDied { entity, killer } = event.payload {
                deaths
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push_back((entity, killer));
            }
        });
        self.subscription = Some(id);
        Ok(())
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let pending: Vec<_> = self
            .deaths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        for (dead, killer) in pending {
            let Some(role) = ctx.registry.component::<Role>(dead).map(|r| *r) else {
                continue;
            };
            if !ctx.registry.contains(dead) {
                continue;
            }
            let loot = ctx
                .registry
                .component::<LootTable>(dead)
                .map(|table| LootTable::clone(&table))
                .unwrap_or_default();

            if let Err(err) = self.drop_loot(ctx, dead, &loot) {
                tracing::error!("No loot dropped for {}: {}", dead, err);
            }
            if let Some(killer) = killer {
                self.award_experience(ctx, killer, loot.experience);
            }
            if role != Role::Player {
                ctx.registry.destroy(dead, DespawnReason::Defeated);
            }
        }
        Ok(())
    }

    fn destroy(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.event_bus.unsubscribe(id);
        }
    }
}
