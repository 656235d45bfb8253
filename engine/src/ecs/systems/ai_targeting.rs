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

//! AI targeting system: aggro acquisition with hysteresis

use super::{System, SystemContext};
use crate::ecs::components::{
    AIController, Capability, Combatant, EntityId, EntityUuid, Position, Role, Stats,
};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::EntitySnapshot;
use crate::error::SystemError;
use hecs::Entity;

/// Picks and drops chase targets for AI-driven entities
///
/// An entity without a target acquires the nearest hostile, targetable,
/// living entity inside its aggro range (ties go to the lower UUID). It keeps
/// that target until the target dies, leaves the registry, or moves beyond
/// the loss range.
pub struct AiTargetingSystem {
    event_bus: EventBus,
}

impl AiTargetingSystem {
    /// Create a new AI targeting system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    fn nearest_hostile(
        candidates: &[EntitySnapshot],
        id: EntityId,
        role: Role,
        position: &Position,
        range: f32,
    ) -> Option<EntityId> {
        candidates
            .iter()
            .filter(|c| c.id != id && role.is_hostile_to(c.role))
            .map(|c| (c.position.distance(position), c.id))
            .filter(|(distance, _)| *distance <= range)
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }
}

impl System for AiTargetingSystem {
    fn name(&self) -> &'static str {
        "ai_targeting"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let candidates: Vec<EntitySnapshot> = ctx
            .registry
            .snapshot_all()
            .into_iter()
            .filter(|c| c.is_alive() && c.role.has(Capability::Targetable))
            .collect();

        // Decide first, then apply, so every AI sees the same candidate set
        let mut decisions = Vec::new();
        {
            let registry = &*ctx.registry;
            let mut query = registry
                .world()
                .query::<(Entity, &EntityUuid, &Role, &Position, &Stats, &AIController)>();
            for (entity, uuid, role, position, stats, ai) in query.iter() {
                if stats.is_defeated() || registry.is_pending_removal(entity) {
                    continue;
                }
                let id = uuid.id(entity);
                let current = ai.target;
                let keep = current
                    .and_then(|target| candidates.iter().find(|c| c.id == target))
                    .is_some_and(|c| c.position.distance(position) <= ai.loss_range());
                if keep {
                    continue;
                }
                let next = Self::nearest_hostile(&candidates, id, *role, position, ai.aggro_range);
                if next != current {
                    decisions.push((id, current, next));
                }
            }
        }

        for (id, previous, next) in decisions {
            if let Some(mut ai) = ctx.registry.component_mut::<AIController>(id) {
                match next {
                    Some(target) => ai.acquire(target),
                    None => {
                        ai.lose();
                    }
                }
            }
            if let Some(mut combatant) = ctx.registry.component_mut::<Combatant>(id) {
                combatant.target = next;
            }

            if let Some(target) = previous {
                tracing::trace!("Entity {} lost target {}", id, target);
                self.event_bus.emit(
                    GameEvent::TargetLost { entity: id, target },
                    ctx.time.now_ms,
                    self.name(),
                );
            }
            if let Some(target) = next {
                tracing::trace!("Entity {} acquired target {}", id, target);
                self.event_bus.emit(
                    GameEvent::TargetAcquired { entity: id, target },
                    ctx.time.now_ms,
                    self.name(),
                );
            }
        }
        Ok(())
    }
}
