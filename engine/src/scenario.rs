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

//! Scripted scenarios for headless runs

use crate::config::{ConfigError, load_yaml};
use dataevolved_common::{Action, InputSnapshot, MapData};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input held over a span of real time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    pub from_ms: f64,
    pub until_ms: f64,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub cursor: Option<(f32, f32)>,
}

impl ScriptedInput {
    fn covers(&self, now_ms: f64) -> bool {
        self.from_ms <= now_ms && now_ms < self.until_ms
    }
}

/// A map plus the player input to replay against it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub map: MapData,
    #[serde(default)]
    pub script: Vec<ScriptedInput>,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_yaml(path)
    }

    /// Merge every scripted input active at `now_ms`
    ///
    /// The last active entry with a cursor wins.
    pub fn input_at(&self, now_ms: f64) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        for entry in self.script.iter().filter(|entry| entry.covers(now_ms)) {
            input.pressed_actions.extend(entry.actions.iter().copied());
            if entry.cursor.is_some() {
                input.cursor = entry.cursor;
            }
        }
        input
    }
}
