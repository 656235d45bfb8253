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

//! Identity components for entity identification and description

use serde::{Deserialize, Serialize};

/// Combined entity identifier containing both ECS runtime handle and stable UUID
///
/// The hecs handle is only valid for the lifetime of the registry that issued
/// it, while the UUID is what external collaborators (network sync, host UI)
/// use to address an entity.
///
/// Note: Only the UUID is serialized since the ECS entity handle is transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityId {
    /// Runtime ECS entity handle (transient)
    #[serde(skip)]
    entity: hecs::Entity,
    /// Stable UUID (unique for the lifetime of a simulation)
    uuid: uuid::Uuid,
}

impl EntityId {
    /// Create a new EntityId from an ECS entity and UUID
    pub fn new(entity: hecs::Entity, uuid: uuid::Uuid) -> Self {
        Self { entity, uuid }
    }

    /// Get the runtime ECS entity handle
    pub fn entity(&self) -> hecs::Entity {
        self.entity
    }

    /// Get the stable UUID
    pub fn uuid(&self) -> uuid::Uuid {
        self.uuid
    }
}

impl From<EntityId> for hecs::Entity {
    fn from(id: EntityId) -> Self {
        id.entity
    }
}

impl From<EntityId> for uuid::Uuid {
    fn from(id: EntityId) -> Self {
        id.uuid
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by UUID so tie-breaks are independent of hecs slot reuse
impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.uuid
            .cmp(&other.uuid)
            .then_with(|| self.entity.cmp(&other.entity))
    }
}

/// UUID component stored on every entity
///
/// Lets systems build an [`EntityId`] straight from a query without going
/// through the registry's lookup tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityUuid(pub uuid::Uuid);

impl EntityUuid {
    /// Create a new random UUID
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Pair this UUID with its runtime handle
    pub fn id(&self, entity: hecs::Entity) -> EntityId {
        EntityId::new(entity, self.0)
    }
}

impl Default for EntityUuid {
    fn default() -> Self {
        Self::new()
    }
}

/// Display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub display: String,
}

impl Name {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }
}
