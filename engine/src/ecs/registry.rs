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

//! Entity Registry owning the ECS world and the UUID lookup tables
//!
//! This module provides:
//! - Creation of entities with the base component set (identity, role, name,
//!   position, stats)
//! - Bidirectional mapping between `EcsEntity` runtime handles and UUIDs
//! - Deferred destruction: entities marked for removal disappear from every
//!   lookup immediately and are despawned at the next [`EntityRegistry::flush`]

use crate::ecs::components::{EntityId, EntityUuid, Name, Position, Role, Stats};
use crate::ecs::{EcsEntity, Entity, GameWorld};
use crate::error::SimError;
use hecs::{Component, DynamicBundle, Ref, RefMut};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Why an entity left the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DespawnReason {
    /// Power reached zero
    Defeated,
    /// Item collected by a player
    PickedUp,
    /// Strayed beyond the world bounds
    OutOfBounds,
    /// Removed by the host
    Explicit,
    /// Removed by an authoritative state patch
    Authoritative,
}

/// Base state every entity is created with
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnState {
    pub name: String,
    pub position: Position,
    pub stats: Stats,
}

impl SpawnState {
    pub fn new(name: impl Into<String>, x: f32, y: f32, stats: Stats) -> Self {
        Self {
            name: name.into(),
            position: Position::new(x, y),
            stats,
        }
    }
}

/// Read-only copy of an entity's base components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub role: Role,
    pub name: String,
    pub position: Position,
    pub stats: Stats,
}

impl EntitySnapshot {
    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }
}

/// Registry owning every entity in the simulation
pub struct EntityRegistry {
    world: GameWorld,

    /// Map from UUID to ECS entity handle
    uuid_to_entity: HashMap<Uuid, EcsEntity>,

    /// Map from ECS entity handle to UUID
    entity_to_uuid: HashMap<EcsEntity, Uuid>,

    /// Entities marked for removal, in marking order
    pending: Vec<(EntityId, DespawnReason)>,
    pending_set: HashSet<EcsEntity>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            world: GameWorld::new(),
            uuid_to_entity: HashMap::new(),
            entity_to_uuid: HashMap::new(),
            pending: Vec::new(),
            pending_set: HashSet::new(),
        }
    }

    /// Create an entity with a fresh UUID
    pub fn create(&mut self, role: Role, state: SpawnState) -> EntityId {
        let uuid = loop {
            let candidate = Uuid::new_v4();
            if !self.uuid_to_entity.contains_key(&candidate) {
                break candidate;
            }
        };
        self.insert(role, uuid, state)
    }

    /// Create an entity under a UUID chosen by the caller
    ///
    /// # Returns
    /// * `Ok(EntityId)` if the entity was created
    /// * `Err(SimError::DuplicateEntity)` if the UUID is already registered
    pub fn create_with_uuid(
        &mut self,
        role: Role,
        uuid: Uuid,
        state: SpawnState,
    ) -> Result<EntityId, SimError> {
        if self.uuid_to_entity.contains_key(&uuid) {
            return Err(SimError::DuplicateEntity(uuid));
        }
        Ok(self.insert(role, uuid, state))
    }

    fn insert(&mut self, role: Role, uuid: Uuid, state: SpawnState) -> EntityId {
        let entity = self.world.spawn((
            EntityUuid(uuid),
            role,
            Name::new(state.name),
            state.position,
            state.stats,
        ));
        self.uuid_to_entity.insert(uuid, entity);
        self.entity_to_uuid.insert(entity, uuid);
        tracing::debug!("Registered {} {} as {:?}", role, uuid, entity);
        EntityId::new(entity, uuid)
    }

    /// Attach role-specific components to an existing entity
    pub fn attach(&mut self, id: EntityId, components: impl DynamicBundle) -> Result<(), SimError> {
        if !self.contains(id) {
            return Err(SimError::EntityNotFound(id.uuid()));
        }
        self.world
            .insert(id.entity(), components)
            .map_err(|_| SimError::EntityNotFound(id.uuid()))
    }

    /// Whether `id` refers to a registered entity that is not pending removal
    pub fn contains(&self, id: EntityId) -> bool {
        !self.pending_set.contains(&id.entity())
            && self.entity_to_uuid.get(&id.entity()) == Some(&id.uuid())
    }

    /// Whether `id` is registered and not defeated
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.contains(id)
            && self
                .component::<Stats>(id)
                .map(|stats| stats.is_alive())
                .unwrap_or(false)
    }

    /// Whether `entity` has been marked for removal but not flushed yet
    pub fn is_pending_removal(&self, entity: EcsEntity) -> bool {
        self.pending_set.contains(&entity)
    }

    /// Look up an entity by UUID
    pub fn resolve(&self, uuid: Uuid) -> Option<EntityId> {
        let entity = *self.uuid_to_entity.get(&uuid)?;
        if self.pending_set.contains(&entity) {
            return None;
        }
        Some(EntityId::new(entity, uuid))
    }

    /// Pair a runtime handle with its UUID
    pub fn id_of(&self, entity: EcsEntity) -> Option<EntityId> {
        let uuid = *self.entity_to_uuid.get(&entity)?;
        Some(EntityId::new(entity, uuid))
    }

    /// Snapshot of an entity's base components
    pub fn get(&self, id: EntityId) -> Option<EntitySnapshot> {
        if !self.contains(id) {
            return None;
        }
        self.snapshot_of(id.entity())
    }

    fn snapshot_of(&self, entity: EcsEntity) -> Option<EntitySnapshot> {
        let mut query = self
            .world
            .query_one::<(&EntityUuid, &Role, &Name, &Position, &Stats)>(entity);
        let (uuid, role, name, position, stats) = query.get().ok()?;
        Some(EntitySnapshot {
            id: uuid.id(entity),
            role: *role,
            name: name.display.clone(),
            position: *position,
            stats: *stats,
        })
    }

    /// Snapshot every entity that is not pending removal
    pub fn snapshot_all(&self) -> Vec<EntitySnapshot> {
        let mut query = self
            .world
            .query::<(Entity, &EntityUuid, &Role, &Name, &Position, &Stats)>();
        query
            .iter()
            .filter(|(entity, ..)| !self.pending_set.contains(entity))
            .map(|(entity, uuid, role, name, position, stats)| EntitySnapshot {
                id: uuid.id(entity),
                role: *role,
                name: name.display.clone(),
                position: *position,
                stats: *stats,
            })
            .collect()
    }

    /// Entities of one role, excluding those pending removal
    ///
    /// The result is a snapshot, so the registry may be mutated while it is
    /// being iterated.
    pub fn query_by_role(&self, role: Role) -> impl Iterator<Item = EntitySnapshot> + use<> {
        self.snapshot_all()
            .into_iter()
            .filter(move |snapshot| snapshot.role == role)
    }

    /// Visit every live entity that is neither defeated nor pending removal
    pub fn for_each_alive<F>(&mut self, mut f: F)
    where
        F: FnMut(EntityId, Role, &mut Position, &mut Stats),
    {
        let pending = &self.pending_set;
        for (entity, uuid, role, position, stats) in self
            .world
            .query_mut::<(Entity, &EntityUuid, &Role, &mut Position, &mut Stats)>()
        {
            if pending.contains(&entity) || stats.is_defeated() {
                continue;
            }
            f(uuid.id(entity), *role, position, stats);
        }
    }

    /// Borrow a component of an entity; `None` once it is marked for removal
    pub fn component<T: Component>(&self, id: EntityId) -> Option<Ref<'_, T>> {
        if !self.contains(id) {
            return None;
        }
        self.world.get::<&T>(id.entity()).ok()
    }

    /// Mutably borrow a component of an entity
    ///
    /// Borrows are checked at runtime per component type, so two different
    /// component types of the same entity may be borrowed at once.
    pub fn component_mut<T: Component>(&self, id: EntityId) -> Option<RefMut<'_, T>> {
        if !self.contains(id) {
            return None;
        }
        self.world.get::<&mut T>(id.entity()).ok()
    }

    /// Mark an entity for removal at the next flush
    ///
    /// # Returns
    /// * `true` if the entity was marked
    /// * `false` if it is unknown or already marked
    pub fn destroy(&mut self, id: EntityId, reason: DespawnReason) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.pending_set.insert(id.entity());
        self.pending.push((id, reason));
        tracing::debug!("Entity {} marked for removal ({:?})", id, reason);
        true
    }

    /// Despawn every entity marked for removal
    ///
    /// # Returns
    /// The removed entities with the reason each was removed, in marking order
    pub fn flush(&mut self) -> Vec<(EntityId, DespawnReason)> {
        let removed = std::mem::take(&mut self.pending);
        self.pending_set.clear();
        for (id, _) in &removed {
            if self.world.despawn(id.entity()).is_err() {
                tracing::warn!("Entity {} was already gone at flush", id);
            }
            self.uuid_to_entity.remove(&id.uuid());
            self.entity_to_uuid.remove(&id.entity());
        }
        removed
    }

    /// The underlying ECS world, for component queries
    pub fn world(&self) -> &GameWorld {
        &self.world
    }

    /// Number of entities not pending removal
    pub fn len(&self) -> usize {
        self.entity_to_uuid.len() - self.pending_set.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entity without raising despawn notifications
    pub fn clear(&mut self) {
        self.world.clear();
        self.uuid_to_entity.clear();
        self.entity_to_uuid.clear();
        self.pending.clear();
        self.pending_set.clear();
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("entities", &self.entity_to_uuid.len())
            .field("pending_removal", &self.pending.len())
            .finish()
    }
}
