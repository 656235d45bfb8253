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

//! Player input snapshot handed to the simulation once per host frame

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Logical player action, already mapped from raw keys by input capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Attack,
    Interact,
}

/// Input state captured out-of-band and applied atomically to a tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub pressed_actions: BTreeSet<Action>,
    /// Cursor position in world coordinates, if over the play area
    pub cursor: Option<(f32, f32)>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.pressed_actions.insert(action);
        self
    }

    pub fn with_cursor(mut self, x: f32, y: f32) -> Self {
        self.cursor = Some((x, y));
        self
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed_actions.contains(&action)
    }

    /// Movement direction requested by the pressed actions, not normalized
    pub fn movement_axis(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            dx -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            dx += 1.0;
        }
        if self.is_pressed(Action::MoveUp) {
            dy -= 1.0;
        }
        if self.is_pressed(Action::MoveDown) {
            dy += 1.0;
        }
        (dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_actions_cancel() {
        let input = InputSnapshot::new()
            .with_action(Action::MoveLeft)
            .with_action(Action::MoveRight)
            .with_action(Action::MoveDown);

        assert_eq!(input.movement_axis(), (0.0, 1.0));
    }

    #[test]
    fn test_snapshot_serialization() {
        let input = InputSnapshot::new()
            .with_action(Action::Attack)
            .with_cursor(10.0, 20.0);

        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"attack\""));

        let decoded: InputSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, input);
    }
}
