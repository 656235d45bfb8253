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

//! Authoritative state patches from network/persistence sync

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direct overwrite of an entity's state, addressed by its persistent UUID
///
/// Every field is optional; absent fields are left untouched. Patches are
/// queued by the host and applied between ticks, never mid-tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatePatch {
    pub entity: Uuid,
    pub position: Option<(f32, f32)>,
    pub power: Option<u32>,
    pub max_power: Option<u32>,
    pub memory: Option<u32>,
    pub firewall: Option<u32>,
    pub ghz: Option<u32>,
    /// Remove the entity at the end of the next tick
    pub remove: bool,
}

impl StatePatch {
    pub fn for_entity(entity: Uuid) -> Self {
        Self {
            entity,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = Some(power);
        self
    }

    pub fn removing(mut self) -> Self {
        self.remove = true;
        self
    }

    /// Whether the patch touches the stat block
    pub fn touches_stats(&self) -> bool {
        self.power.is_some()
            || self.max_power.is_some()
            || self.memory.is_some()
            || self.firewall.is_some()
            || self.ghz.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_patch_deserializes() {
        let uuid = Uuid::new_v4();
        let json = format!(r#"{{ "entity": "{}", "power": 12 }}"#, uuid);
        let patch: StatePatch = serde_json::from_str(&json).unwrap();

        assert_eq!(patch.entity, uuid);
        assert_eq!(patch.power, Some(12));
        assert!(patch.position.is_none());
        assert!(patch.touches_stats());
        assert!(!patch.remove);
    }

    #[test]
    fn test_position_only_patch() {
        let patch = StatePatch::for_entity(Uuid::new_v4()).with_position(1.0, 2.0);
        assert!(!patch.touches_stats());
    }
}
