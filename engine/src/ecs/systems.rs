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

//! ECS Systems
//!
//! This module contains the [`System`] lifecycle, the ordered
//! [`SystemRegistry`], and every system implementation that operates on
//! components. Systems contain the game logic and behavior.

mod ai_targeting;
mod combat;
mod death_loot;
mod interaction;
mod movement;
mod path_following;
mod schedule;
mod status_effects;
mod world_bounds;

// Re-export all systems
pub use ai_targeting::*;
pub use combat::*;
pub use death_loot::*;
pub use interaction::*;
pub use movement::*;
pub use path_following::*;
pub use schedule::*;
pub use status_effects::*;
pub use world_bounds::*;
