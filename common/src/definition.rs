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

//! Entity definitions supplied by map loading and content spawners

use serde::{Deserialize, Serialize};

/// Stat block of an entity as authored in content data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    /// Current power (hit points)
    pub power: u32,
    /// Maximum power; current power is clamped to this
    pub max_power: u32,
    /// Secondary resource
    pub memory: u32,
    /// Flat damage mitigation
    pub firewall: u32,
    /// Attack strength
    pub ghz: u32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            power: 100,
            max_power: 100,
            memory: 0,
            firewall: 0,
            ghz: 1,
        }
    }
}

/// Stat targeted by a status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStat {
    Firewall,
    Ghz,
    Memory,
}

/// Time-bounded stat modifier applied by an attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Effect name; re-applying an effect with the same name replaces it
    pub name: String,
    pub stat: EffectStat,
    /// Requested change to the stat; negative values are debuffs
    pub delta: i32,
    pub duration_ms: f64,
}

/// Melee/ranged attack profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    /// Maximum distance, in world units, at which an attack lands
    pub range: f32,
    /// Overrides the configured attack cooldown when present
    #[serde(default)]
    pub cooldown_ms: Option<f64>,
    /// Status effect applied to the defender on every hit
    #[serde(default)]
    pub on_hit: Option<EffectDefinition>,
}

/// Target acquisition profile for AI-driven entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggroDefinition {
    /// Distance within which a target is acquired
    pub aggro_range: f32,
    /// Overrides the configured aggro loss multiplier when present
    #[serde(default)]
    pub loss_multiplier: Option<f32>,
}

/// Item payload carried by Item entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub item_id: String,
    #[serde(default = "ItemDefinition::default_quantity")]
    pub quantity: u32,
}

impl ItemDefinition {
    fn default_quantity() -> u32 {
        1
    }

    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

/// One roll of a loot table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: ItemDefinition,
    /// Probability in `[0, 1]` that this entry drops
    pub chance: f64,
}

/// Full definition of a spawnable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefinition {
    pub name: String,
    pub stats: StatBlock,
    /// Movement speed in world units per second
    pub speed: f32,
    pub attack: Option<AttackDefinition>,
    pub aggro: Option<AggroDefinition>,
    /// World objects only: whether the player can interact with it
    pub interactive: bool,
    /// Items only: what is picked up
    pub item: Option<ItemDefinition>,
    /// Rolled when the entity is defeated
    pub loot: Vec<LootEntry>,
    /// Experience granted to the killer
    pub experience: u64,
}

impl Default for EntityDefinition {
    fn default() -> Self {
        Self {
            name: String::from("unnamed"),
            stats: StatBlock::default(),
            speed: 0.0,
            attack: None,
            aggro: None,
            interactive: false,
            item: None,
            loot: Vec::new(),
            experience: 0,
        }
    }
}

impl EntityDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stats(mut self, stats: StatBlock) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_attack(mut self, range: f32, cooldown_ms: Option<f64>) -> Self {
        self.attack = Some(AttackDefinition {
            range,
            cooldown_ms,
            on_hit: None,
        });
        self
    }

    pub fn with_aggro(mut self, aggro_range: f32) -> Self {
        self.aggro = Some(AggroDefinition {
            aggro_range,
            loss_multiplier: None,
        });
        self
    }
}

/// Request to introduce an entity into the simulation
///
/// `role` is a free-form string from content data (`"player"`, `"npc"`,
/// `"enemy"`, `"object"`, `"item"`); unknown roles are rejected by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub role: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub definition: EntityDefinition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_defaults_fill_missing_fields() {
        let json = r#"{ "name": "Sentinel", "stats": { "power": 30, "max_power": 30 } }"#;
        let definition: EntityDefinition = serde_json::from_str(json).unwrap();

        assert_eq!(definition.name, "Sentinel");
        assert_eq!(definition.stats.power, 30);
        assert_eq!(definition.stats.ghz, 1);
        assert!(definition.attack.is_none());
        assert!(definition.loot.is_empty());
    }

    #[test]
    fn test_spawn_request_from_yaml() {
        let yaml = "role: enemy\nx: 48.0\ny: 16.0\ndefinition:\n  name: Glitch\n  speed: 40.0\n  aggro:\n    aggro_range: 96.0\n  loot:\n    - item: { item_id: shard }\n      chance: 0.5\n";
        let request: SpawnRequest = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(request.role, "enemy");
        assert_eq!(request.definition.speed, 40.0);
        assert_eq!(request.definition.aggro.as_ref().unwrap().aggro_range, 96.0);
        assert_eq!(request.definition.loot[0].item.quantity, 1);
    }
}
