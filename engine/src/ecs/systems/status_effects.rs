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

//! Status effect system: counts down timed stat modifiers

use super::{System, SystemContext};
use crate::combat::expire_status_effects;
use crate::ecs::components::{EntityId, EntityUuid, StatusEffects};
use crate::ecs::events::EventBus;
use crate::error::SystemError;
use hecs::Entity;

/// Expires status effects and restores the stats they modified
pub struct StatusEffectSystem {
    event_bus: EventBus,
}

impl StatusEffectSystem {
    /// Create a new status effect system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }
}

impl System for StatusEffectSystem {
    fn name(&self) -> &'static str {
        "status_effects"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let affected: Vec<EntityId> = {
            let registry = &*ctx.registry;
            let mut query = registry
                .world()
                .query::<(Entity, &EntityUuid, &StatusEffects)>();
            query
                .iter()
                .filter(|(entity, _, effects)| {
                    !effects.is_empty() && !registry.is_pending_removal(*entity)
                })
                .map(|(entity, uuid, _)| uuid.id(entity))
                .collect()
        };

        let end_ms = ctx.time.now_ms + ctx.time.step_ms;
        for id in affected {
            expire_status_effects(ctx.registry, &self.event_bus, id, ctx.time.step_ms, end_ms);
        }
        Ok(())
    }
}
