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

//! Data Evolved Simulation Core
//!
//! Real-time entity simulation for the Data Evolved browser game:
//! - Entity registry with roles, capabilities, and deferred removal
//! - Ordered systems run on a fixed timestep with fault isolation
//! - Typed event bus shared by systems and the host
//! - Grid A* pathfinding for AI movement
//! - Damage, status effects, loot, and experience
//!
//! Hosts embed a [`client::GameClient`] and drive it once per frame.

pub mod client;
pub mod clock;
pub mod combat;
pub mod config;
pub mod ecs;
pub mod error;
pub mod pathfinding;
pub mod scenario;

pub use client::{GameClient, RenderSurface, TickReport};
pub use clock::{ClockState, FixedTimestep, FrameStats};
pub use config::Configuration;
pub use ecs::components::{Capability, EntityId, Role};
pub use ecs::events::{Event, EventType, GameEvent};
pub use ecs::registry::{DespawnReason, EntitySnapshot};
pub use error::{SimError, SystemError};
pub use scenario::Scenario;
