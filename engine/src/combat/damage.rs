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

//! Damage computation and the single damage choke point

use super::effects::apply_status_effect;
use crate::ecs::components::{Combatant, EntityId, Stats};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::EntityRegistry;

/// Damage dealt by an attack: attacker ghz less defender firewall, at least 1
pub fn compute_damage(attacker_ghz: u32, defender_firewall: u32) -> u32 {
    attacker_ghz.saturating_sub(defender_firewall).max(1)
}

/// Result of [`apply_damage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Power was reduced and the entity survived
    Damaged { remaining: u32 },
    /// Power reached zero; `EntityDied` was published
    Defeated,
    /// The entity was already defeated; nothing changed
    AlreadyDefeated,
    /// The entity is not registered
    Missing,
}

/// Reduce an entity's power by `amount`
///
/// Power is clamped at zero. The transition to defeated happens here and only
/// here, so `EntityDied` is published exactly once per entity no matter how
/// many hits land in the same step.
pub fn apply_damage(
    registry: &EntityRegistry,
    event_bus: &EventBus,
    target: EntityId,
    amount: u32,
    killer: Option<EntityId>,
    now_ms: f64,
) -> DamageOutcome {
    if !registry.contains(target) {
        return DamageOutcome::Missing;
    }
    let outcome = {
        let Some(mut stats) = registry.component_mut::<Stats>(target) else {
            return DamageOutcome::Missing;
        };
        if stats.is_defeated() {
            return DamageOutcome::AlreadyDefeated;
        }
        let remaining = stats.power().saturating_sub(amount);
        if remaining == 0 {
            stats.mark_defeated();
            DamageOutcome::Defeated
        } else {
            stats.set_power(remaining);
            DamageOutcome::Damaged { remaining }
        }
    };

    if outcome == DamageOutcome::Defeated {
        tracing::debug!("Entity {} defeated by {:?}", target, killer.map(|k| k.uuid()));
        event_bus.emit(
            GameEvent::EntityDied {
                entity: target,
                killer,
            },
            now_ms,
            "combat",
        );
    }
    outcome
}

/// Result of a landed attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: u32,
    pub result: DamageOutcome,
}

/// Resolve one attack from `attacker` against `defender`
///
/// Both entities must be alive. The attacker's cooldown starts, the defender
/// takes damage through [`apply_damage`], and the attacker's on-hit effect is
/// applied to a surviving defender. Range and cooldown checks are the
/// caller's responsibility.
pub fn resolve_attack(
    registry: &EntityRegistry,
    event_bus: &EventBus,
    attacker: EntityId,
    defender: EntityId,
    now_ms: f64,
) -> Option<AttackOutcome> {
    if !registry.is_alive(attacker) || !registry.is_alive(defender) {
        return None;
    }
    let ghz = registry.component::<Stats>(attacker)?.ghz;
    let firewall = registry.component::<Stats>(defender)?.firewall;
    let damage = compute_damage(ghz, firewall);

    let on_hit = {
        let mut combatant = registry.component_mut::<Combatant>(attacker);
        if let Some(combatant) = combatant.as_mut() {
            combatant.record_attack(now_ms);
        }
        combatant.and_then(|c| c.on_hit.clone())
    };

    event_bus.emit(
        GameEvent::EntityAttacked {
            attacker,
            defender,
            damage,
        },
        now_ms,
        "combat",
    );

    let result = apply_damage(registry, event_bus, defender, damage, Some(attacker), now_ms);
    match result {
        DamageOutcome::Damaged { .. } => {
            if let Some(effect) = on_hit {
                apply_status_effect(registry, event_bus, defender, &effect, now_ms);
            }
        }
        DamageOutcome::Defeated => {
            if let Some(mut combatant) = registry.component_mut::<Combatant>(attacker) {
                combatant.target = None;
            }
        }
        DamageOutcome::AlreadyDefeated | DamageOutcome::Missing => {}
    }

    Some(AttackOutcome { damage, result })
}
