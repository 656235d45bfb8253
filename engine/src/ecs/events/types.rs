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

//! Event type definitions

use crate::ecs::DespawnReason;
use crate::ecs::components::{EntityId, Role};
use dataevolved_common::EffectStat;
use enum_kinds::EnumKind;
use serde::{Deserialize, Serialize};

/// All possible game events
///
/// Events carry [`EntityId`] so host-side subscribers can address entities
/// by UUID without touching the registry. Subscriptions are keyed by the
/// derived [`EventType`].
#[derive(Debug, Clone, PartialEq, Serialize, EnumKind)]
#[enum_kind(EventType, derive(Hash, PartialOrd, Ord, Serialize, Deserialize))]
pub enum GameEvent {
    // Entity lifecycle
    EntitySpawned {
        entity: EntityId,
        role: Role,
    },
    EntityDespawned {
        entity: EntityId,
        reason: DespawnReason,
    },

    // Combat
    EntityAttacked {
        attacker: EntityId,
        defender: EntityId,
        damage: u32,
    },
    EntityDied {
        entity: EntityId,
        killer: Option<EntityId>,
    },
    TargetAcquired {
        entity: EntityId,
        target: EntityId,
    },
    TargetLost {
        entity: EntityId,
        target: EntityId,
    },
    StatusEffectApplied {
        entity: EntityId,
        name: String,
        stat: EffectStat,
        delta: i64,
    },
    StatusEffectExpired {
        entity: EntityId,
        name: String,
        stat: EffectStat,
        delta: i64,
    },

    // Items and interaction
    ItemDropped {
        item: EntityId,
        source: EntityId,
        item_id: String,
    },
    ItemPickedUp {
        entity: EntityId,
        item: EntityId,
        item_id: String,
        quantity: u32,
    },
    EntityInteracted {
        entity: EntityId,
        target: EntityId,
    },
    ExperienceGained {
        entity: EntityId,
        amount: u64,
        total: u64,
    },

    // Synchronization
    StatePatched {
        entity: EntityId,
    },

    // Custom events
    Custom {
        event_type: String,
        data: String,
    },
}

impl GameEvent {
    pub fn event_type(&self) -> EventType {
        EventType::from(self)
    }
}

/// Published event with its envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub payload: GameEvent,
    /// Simulation time at which the event was raised
    pub timestamp_ms: f64,
    /// Name of the system or component that raised it
    pub source: Option<&'static str>,
}

impl Event {
    pub fn new(payload: GameEvent, timestamp_ms: f64) -> Self {
        Self {
            payload,
            timestamp_ms,
            source: None,
        }
    }

    pub fn with_source(mut self, source: &'static str) -> Self {
        self.source = Some(source);
        self
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_id(n: u128) -> EntityId {
        let mut world = hecs::World::new();
        EntityId::new(world.spawn(()), uuid::Uuid::from_u128(n))
    }

    #[test]
    fn test_event_type_follows_payload() {
        let event = Event::new(
            GameEvent::EntityDied {
                entity: test_id(1),
                killer: None,
            },
            250.0,
        )
        .with_source("combat");

        assert_eq!(event.event_type(), EventType::EntityDied);
        assert_eq!(event.source, Some("combat"));
        assert_eq!(event.timestamp_ms, 250.0);
    }

    #[test]
    fn test_event_serializes_for_host() {
        let event = Event::new(
            GameEvent::EntityAttacked {
                attacker: test_id(1),
                defender: test_id(2),
                damage: 10,
            },
            16.0,
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payload"]["EntityAttacked"]["damage"], 10);
        assert_eq!(json["timestamp_ms"], 16.0);
    }

    #[test]
    fn test_custom_event() {
        let event = GameEvent::Custom {
            event_type: "scripted".into(),
            data: "door_open".into(),
        };
        assert_eq!(event.event_type(), EventType::Custom);
    }
}
