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

//! ECS Components
//!
//! This module contains all component definitions for the simulation.
//! Components are pure data structures that can be attached to entities.
//! Every entity carries the base set (identity, role, position, stats);
//! role-specific data lives in side-table components attached at spawn.

mod ai;
mod combat;
mod identity;
mod role;
mod spatial;
mod stats;

// Re-export all components
pub use ai::*;
pub use combat::*;
pub use identity::*;
pub use role::*;
pub use spatial::*;
pub use stats::*;
