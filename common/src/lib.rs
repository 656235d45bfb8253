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

//! Data Evolved Common Types
//!
//! This crate defines the data the simulation core exchanges with its
//! external collaborators:
//! - Entity definitions and spawn requests (map loader, content spawners)
//! - Map and tile data (map loader)
//! - Player input snapshots (input capture)
//! - Authoritative state patches (network/persistence sync)

pub mod definition;
pub mod input;
pub mod map;
pub mod patch;

pub use definition::{
    AggroDefinition, AttackDefinition, EffectDefinition, EffectStat, EntityDefinition, ItemDefinition,
    LootEntry, SpawnRequest, StatBlock,
};
pub use input::{Action, InputSnapshot};
pub use map::MapData;
pub use patch::StatePatch;
