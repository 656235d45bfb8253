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

//! Combat system for fighting mechanics

use super::{System, SystemContext};
use crate::combat::resolve_attack;
use crate::ecs::components::{Combatant, EntityId, EntityUuid, Position, Stats};
use crate::ecs::events::EventBus;
use crate::error::SystemError;
use hecs::Entity;

/// Lands attacks for every combatant whose target is in range and whose
/// cooldown has elapsed
pub struct CombatSystem {
    event_bus: EventBus,
}

impl CombatSystem {
    /// Create a new combat system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl System for CombatSystem {
    fn name(&self) -> &'static str {
        "combat"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let now_ms = ctx.time.now_ms;

        // Collect attacks first
        let attacks: Vec<(EntityId, EntityId, f32)> = {
            let registry = &*ctx.registry;
            let mut query = registry
                .world()
                .query::<(Entity, &EntityUuid, &Stats, &Combatant)>();
            query
                .iter()
                .filter(|(entity, _, stats, combatant)| {
                    stats.is_alive()
                        && !registry.is_pending_removal(*entity)
                        && combatant.can_attack(now_ms)
                })
                .filter_map(|(entity, uuid, _, combatant)| {
                    combatant
                        .target
                        .map(|target| (uuid.id(entity), target, combatant.attack_range))
                })
                .collect()
        };

        // Execute attacks; earlier hits in this pass may have defeated later targets
        for (attacker, defender, range) in attacks {
            if !ctx.registry.is_alive(attacker) {
                continue;
            }
            if !ctx.registry.is_alive(defender) {
                if let Some(mut combatant) = ctx.registry.component_mut::<Combatant>(attacker) {
                    combatant.target = None;
                }
                continue;
            }

            let in_range = match (
                ctx.registry.component::<Position>(attacker),
                ctx.registry.component::<Position>(defender),
            ) {
                (Some(a), Some(d)) => a.distance(&d) <= range,
                _ => false,
            };
            if !in_range {
                continue;
            }

            if let Some(outcome) = resolve_attack(ctx.registry, &self.event_bus, attacker, defender, now_ms) {
                tracing::trace!(
                    "{} hit {} for {} ({:?})",
                    attacker,
                    defender,
                    outcome.damage,
                    outcome.result
                );
            }
        }
        Ok(())
    }
}
