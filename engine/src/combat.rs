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

//! Combat resolution
//!
//! Every change to an entity's power that can defeat it goes through
//! [`apply_damage`], which is the only place that flips an entity to
//! defeated and publishes `EntityDied`.

mod damage;
mod effects;

pub use damage::{AttackOutcome, DamageOutcome, apply_damage, compute_damage, resolve_attack};
pub use effects::{apply_status_effect, expire_status_effects};
