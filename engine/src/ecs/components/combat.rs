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

//! Combat components for attacking and timed stat modifiers

use super::EntityId;
use dataevolved_common::{EffectDefinition, EffectStat};
use serde::{Deserialize, Serialize};

/// Attack state component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Combatant {
    /// Maximum distance at which an attack lands
    pub attack_range: f32,
    pub cooldown_ms: f64,
    /// Simulation time of the last landed attack
    pub last_attack_ms: Option<f64>,
    /// Entity this combatant attacks when able
    pub target: Option<EntityId>,
    /// Effect applied to the defender on every hit
    pub on_hit: Option<EffectDefinition>,
}

impl Combatant {
    /// Create a new combatant
    pub fn new(attack_range: f32, cooldown_ms: f64) -> Self {
        Self {
            attack_range,
            cooldown_ms,
            last_attack_ms: None,
            target: None,
            on_hit: None,
        }
    }

    pub fn with_on_hit(mut self, effect: Option<EffectDefinition>) -> Self {
        self.on_hit = effect;
        self
    }

    /// Check if the cooldown has elapsed at `now_ms`
    pub fn can_attack(&self, now_ms: f64) -> bool {
        match self.last_attack_ms {
            Some(last) => now_ms - last >= self.cooldown_ms,
            None => true,
        }
    }

    /// Start the cooldown
    pub fn record_attack(&mut self, now_ms: f64) {
        self.last_attack_ms = Some(now_ms);
    }
}

/// Status effect currently modifying an entity
///
/// `applied_delta` is the change actually made to the stat after clamping,
/// which is exactly what gets reversed on expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub name: String,
    pub stat: EffectStat,
    pub applied_delta: i64,
    pub remaining_ms: f64,
}

/// Status effects component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<ActiveEffect>,
}

impl StatusEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_effect(&mut self, effect: ActiveEffect) {
        self.effects.push(effect);
    }

    /// Remove an effect by name, returning it so it can be reversed
    pub fn remove_effect(&mut self, name: &str) -> Option<ActiveEffect> {
        let index = self.effects.iter().position(|e| e.name == name)?;
        Some(self.effects.remove(index))
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    pub fn get_effect(&self, name: &str) -> Option<&ActiveEffect> {
        self.effects.iter().find(|e| e.name == name)
    }

    /// Advance durations and drain the effects that ran out
    pub fn update(&mut self, delta_ms: f64) -> Vec<ActiveEffect> {
        for effect in &mut self.effects {
            effect.remaining_ms -= delta_ms;
        }
        let (expired, active) = std::mem::take(&mut self.effects)
            .into_iter()
            .partition(|e| e.remaining_ms <= 0.0);
        self.effects = active;
        expired
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(name: &str, remaining_ms: f64) -> ActiveEffect {
        ActiveEffect {
            name: name.to_string(),
            stat: EffectStat::Firewall,
            applied_delta: -2,
            remaining_ms,
        }
    }

    #[test]
    fn test_cooldown_gates_attacks() {
        let mut combatant = Combatant::new(16.0, 1000.0);
        assert!(combatant.can_attack(0.0));

        combatant.record_attack(100.0);
        assert!(!combatant.can_attack(1099.0));
        assert!(combatant.can_attack(1100.0));
    }

    #[test]
    fn test_zero_cooldown_allows_every_step() {
        let mut combatant = Combatant::new(16.0, 0.0);
        combatant.record_attack(50.0);
        assert!(combatant.can_attack(50.0));
    }

    #[test]
    fn test_status_effects_expire() {
        let mut effects = StatusEffects::new();
        effects.add_effect(effect("corrode", 100.0));
        effects.add_effect(effect("overclock", 300.0));

        assert!(effects.update(50.0).is_empty());
        let expired = effects.update(50.0);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name, "corrode");
        assert!(effects.has_effect("overclock"));
        assert!(!effects.has_effect("corrode"));
    }

    #[test]
    fn test_remove_effect_returns_it() {
        let mut effects = StatusEffects::new();
        effects.add_effect(effect("corrode", 100.0));

        let removed = effects.remove_effect("corrode").unwrap();
        assert_eq!(removed.applied_delta, -2);
        assert!(effects.is_empty());
        assert!(effects.remove_effect("corrode").is_none());
    }
}
