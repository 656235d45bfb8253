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

//! Interaction system: item pickup and world object use

use super::{System, SystemContext};
use crate::config::WorldConfig;
use crate::ecs::DespawnReason;
use crate::ecs::components::{EntityId, Interactable, Inventory, Pickup, Role};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::EntitySnapshot;
use crate::error::SystemError;
use dataevolved_common::Action;

/// Lets players collect items and use world objects
///
/// Items within the pickup radius of a living player are collected
/// automatically. The interact action uses the nearest enabled world object
/// within the interact radius, once per press.
pub struct InteractionSystem {
    event_bus: EventBus,
    pickup_radius: f32,
    interact_radius: f32,
    interact_held: bool,
}

impl InteractionSystem {
    /// Create a new interaction system
    pub fn new(event_bus: EventBus, config: &WorldConfig) -> Self {
        Self {
            event_bus,
            pickup_radius: config.pickup_radius,
            interact_radius: config.interact_radius,
            interact_held: false,
        }
    }

    fn collect_items(&self, ctx: &mut SystemContext<'_>, player: &EntitySnapshot) {
        let items: Vec<EntitySnapshot> = ctx
            .registry
            .query_by_role(Role::Item)
            .filter(|item| item.position.distance(&player.position) <= self.pickup_radius)
            .collect();

        for item in items {
            let Some(payload) = ctx
                .registry
                .component::<Pickup>(item.id)
                .map(|pickup| pickup.item.clone())
            else {
                continue;
            };
            match ctx.registry.component_mut::<Inventory>(player.id) {
                Some(mut inventory) => inventory.add(&payload),
                None => return,
            }
            ctx.registry.destroy(item.id, DespawnReason::PickedUp);
            self.event_bus.emit(
                GameEvent::ItemPickedUp {
                    entity: player.id,
                    item: item.id,
                    item_id: payload.item_id,
                    quantity: payload.quantity,
                },
                ctx.time.now_ms,
                self.name(),
            );
        }
    }

    fn nearest_object(&self, ctx: &SystemContext<'_>, player: &EntitySnapshot) -> Option<EntityId> {
        ctx.registry
            .query_by_role(Role::WorldObject)
            .filter(|object| {
                ctx.registry
                    .component::<Interactable>(object.id)
                    .is_some_and(|i| i.enabled)
            })
            .map(|object| (object.position.distance(&player.position), object.id))
            .filter(|(distance, _)| *distance <= self.interact_radius)
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }
}

impl System for InteractionSystem {
    fn name(&self) -> &'static str {
        "interaction"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let pressed = ctx.input.is_pressed(Action::Interact);
        let interact = pressed && !self.interact_held;
        self.interact_held = pressed;

        let players: Vec<EntitySnapshot> = ctx
            .registry
            .query_by_role(Role::Player)
            .filter(EntitySnapshot::is_alive)
            .collect();

        for player in players {
            self.collect_items(ctx, &player);

            if interact {
                if let Some(target) = self.nearest_object(ctx, &player) {
                    self.event_bus.emit(
                        GameEvent::EntityInteracted {
                            entity: player.id,
                            target,
                        },
                        ctx.time.now_ms,
                        self.name(),
                    );
                }
            }
        }
        Ok(())
    }
}
