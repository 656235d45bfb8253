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

//! Timed stat modifiers

use crate::ecs::components::{ActiveEffect, EntityId, Stats, StatusEffects};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::EntityRegistry;
use dataevolved_common::{EffectDefinition, EffectStat};

/// Shift a stat by `delta`, clamped to the `u32` range; returns the change made
fn shift_stat(stats: &mut Stats, stat: EffectStat, delta: i64) -> i64 {
    let current = i64::from(stats.get(stat));
    let updated = (current + delta).clamp(0, i64::from(u32::MAX));
    stats.set(stat, updated as u32);
    updated - current
}

/// Apply a status effect to a living entity
///
/// An effect with the same name already on the entity is reversed and
/// replaced, so effects never stack with themselves. Returns the delta
/// actually applied after clamping, or `None` if the entity cannot carry
/// effects.
pub fn apply_status_effect(
    registry: &EntityRegistry,
    event_bus: &EventBus,
    target: EntityId,
    effect: &EffectDefinition,
    now_ms: f64,
) -> Option<i64> {
    if !registry.is_alive(target) {
        return None;
    }
    let mut stats = registry.component_mut::<Stats>(target)?;
    let mut effects = registry.component_mut::<StatusEffects>(target)?;

    if let Some(previous) = effects.remove_effect(&effect.name) {
        shift_stat(&mut stats, previous.stat, -previous.applied_delta);
    }
    let applied = shift_stat(&mut stats, effect.stat, i64::from(effect.delta));
    effects.add_effect(ActiveEffect {
        name: effect.name.clone(),
        stat: effect.stat,
        applied_delta: applied,
        remaining_ms: effect.duration_ms,
    });
    drop(effects);
    drop(stats);

    event_bus.emit(
        GameEvent::StatusEffectApplied {
            entity: target,
            name: effect.name.clone(),
            stat: effect.stat,
            delta: applied,
        },
        now_ms,
        "status_effects",
    );
    Some(applied)
}

/// Advance an entity's effects by `delta_ms` and reverse the ones that ran out
///
/// Returns the number of effects that expired.
pub fn expire_status_effects(
    registry: &EntityRegistry,
    event_bus: &EventBus,
    target: EntityId,
    delta_ms: f64,
    now_ms: f64,
) -> usize {
    let expired: Vec<ActiveEffect> = {
        let Some(mut effects) = registry.component_mut::<StatusEffects>(target) else {
            return 0;
        };
        let expired = effects.update(delta_ms);
        if expired.is_empty() {
            return 0;
        }
        expired
    };

    if let Some(mut stats) = registry.component_mut::<Stats>(target) {
        for effect in &expired {
            shift_stat(&mut stats, effect.stat, -effect.applied_delta);
        }
    }

    for effect in &expired {
        event_bus.emit(
            GameEvent::StatusEffectExpired {
                entity: target,
                name: effect.name.clone(),
                stat: effect.stat,
                delta: effect.applied_delta,
            },
            now_ms,
            "status_effects",
        );
    }
    expired.len()
}
