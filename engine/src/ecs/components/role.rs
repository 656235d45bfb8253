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

//! Role classification, capability flags, and role-specific side tables

use crate::error::SimError;
use dataevolved_common::{ItemDefinition, LootEntry};
use flagset::{FlagSet, flags};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

flags! {
    /// What the simulation is allowed to do with an entity
    pub enum Capability: u8 {
        /// Driven by systems every fixed step
        Updatable,
        /// Drawn by the render pass
        Renderable,
        /// Can be picked up or used by a player
        Interactable,
        /// Can be selected as an attack target
        Targetable,
    }
}

/// Entity role
///
/// Every entity has exactly one role; systems branch on it when deciding
/// hostility, targeting, and which side tables to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Player,
    NpcAi,
    EnemyAi,
    WorldObject,
    Item,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "player",
            Role::NpcAi => "npc",
            Role::EnemyAi => "enemy",
            Role::WorldObject => "object",
            Role::Item => "item",
        }
    }

    /// Capability set granted to every entity of this role
    pub fn capabilities(&self) -> FlagSet<Capability> {
        match self {
            Role::Player | Role::EnemyAi => {
                Capability::Updatable | Capability::Renderable | Capability::Targetable
            }
            Role::NpcAi => {
                Capability::Updatable
                    | Capability::Renderable
                    | Capability::Targetable
                    | Capability::Interactable
            }
            Role::WorldObject | Role::Item => Capability::Renderable | Capability::Interactable,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities().contains(capability)
    }

    /// Whether an entity of this role attacks entities of `other`
    pub fn is_hostile_to(&self, other: Role) -> bool {
        matches!(
            (self, other),
            (Role::EnemyAi, Role::Player)
                | (Role::EnemyAi, Role::NpcAi)
                | (Role::Player, Role::EnemyAi)
                | (Role::NpcAi, Role::EnemyAi)
        )
    }

    /// Whether this role is driven by the AI targeting and path following systems
    pub fn is_ai(&self) -> bool {
        matches!(self, Role::NpcAi | Role::EnemyAi)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" => Ok(Role::Player),
            "npc" | "npc_ai" => Ok(Role::NpcAi),
            "enemy" | "enemy_ai" => Ok(Role::EnemyAi),
            "object" | "world_object" => Ok(Role::WorldObject),
            "item" => Ok(Role::Item),
            _ => Err(SimError::UnknownRole(s.to_string())),
        }
    }
}

/// Items carried by a player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<ItemDefinition>,
}

impl Inventory {
    /// Add an item, merging quantities of the same item id
    pub fn add(&mut self, item: &ItemDefinition) {
        match self.items.iter_mut().find(|i| i.item_id == item.item_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => self.items.push(item.clone()),
        }
    }

    pub fn quantity_of(&self, item_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.item_id == item_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }
}

/// Experience accumulated by a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub points: u64,
}

/// World object the player can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactable {
    pub enabled: bool,
}

/// Item payload of an Item entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub item: ItemDefinition,
}

/// What a defeated entity leaves behind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub entries: Vec<LootEntry>,
    /// Experience awarded to the killer
    pub experience: u64,
}

impl LootTable {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.experience == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_accepts_aliases() {
        assert_eq!("player".parse::<Role>().unwrap(), Role::Player);
        assert_eq!("NPC".parse::<Role>().unwrap(), Role::NpcAi);
        assert_eq!("enemy_ai".parse::<Role>().unwrap(), Role::EnemyAi);
        assert_eq!("object".parse::<Role>().unwrap(), Role::WorldObject);
        assert_eq!(" item ".parse::<Role>().unwrap(), Role::Item);
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let err = "dragon".parse::<Role>().unwrap_err();
        assert!(matches!(err, SimError::UnknownRole(ref role) if role == "dragon"));
    }

    #[test]
    fn test_capabilities_by_role() {
        assert!(Role::Player.has(Capability::Targetable));
        assert!(Role::EnemyAi.has(Capability::Updatable));
        assert!(!Role::Item.has(Capability::Targetable));
        assert!(Role::Item.has(Capability::Interactable));
        assert!(!Role::WorldObject.has(Capability::Updatable));
        assert!(Role::WorldObject.has(Capability::Renderable));
    }

    #[test]
    fn test_hostility_is_symmetric_between_factions() {
        assert!(Role::EnemyAi.is_hostile_to(Role::Player));
        assert!(Role::Player.is_hostile_to(Role::EnemyAi));
        assert!(Role::NpcAi.is_hostile_to(Role::EnemyAi));
        assert!(!Role::Player.is_hostile_to(Role::NpcAi));
        assert!(!Role::EnemyAi.is_hostile_to(Role::EnemyAi));
        assert!(!Role::EnemyAi.is_hostile_to(Role::Item));
    }

    #[test]
    fn test_inventory_merges_quantities() {
        let mut inventory = Inventory::default();
        inventory.add(&ItemDefinition::new("shard", 1));
        inventory.add(&ItemDefinition::new("shard", 2));
        inventory.add(&ItemDefinition::new("patch", 1));

        assert_eq!(inventory.items.len(), 2);
        assert_eq!(inventory.quantity_of("shard"), 3);
        assert_eq!(inventory.quantity_of("missing"), 0);
    }
}
