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

//! AI components for target acquisition and chasing

use crate::ecs::components::EntityId;
use serde::Serialize;

/// What an AI entity is currently doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum AiState {
    #[default]
    Idle,
    /// Moving toward its target
    Chasing,
    /// Holding position within attack range of its target
    Attacking,
}

/// AI controller component
///
/// A target is acquired inside `aggro_range` and kept until it moves beyond
/// `aggro_range * loss_multiplier`, so targets do not flicker at the edge.
#[derive(Debug, Clone, Serialize)]
pub struct AIController {
    pub aggro_range: f32,
    pub loss_multiplier: f32,
    pub target: Option<EntityId>,
    pub state: AiState,
}

impl AIController {
    /// Create a new AI controller
    pub fn new(aggro_range: f32, loss_multiplier: f32) -> Self {
        Self {
            aggro_range,
            loss_multiplier: loss_multiplier.max(1.0),
            target: None,
            state: AiState::Idle,
        }
    }

    /// Distance beyond which the current target is dropped
    pub fn loss_range(&self) -> f32 {
        self.aggro_range * self.loss_multiplier
    }

    pub fn acquire(&mut self, target: EntityId) {
        self.target = Some(target);
        self.state = AiState::Chasing;
    }

    pub fn lose(&mut self) -> Option<EntityId> {
        self.state = AiState::Idle;
        self.target.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_range_applies_multiplier() {
        let ai = AIController::new(100.0, 1.5);
        assert_eq!(ai.loss_range(), 150.0);
    }

    #[test]
    fn test_multiplier_never_shrinks_range() {
        let ai = AIController::new(100.0, 0.5);
        assert_eq!(ai.loss_range(), 100.0);
    }

    #[test]
    fn test_acquire_and_lose() {
        let mut world = hecs::World::new();
        let target = EntityId::new(world.spawn(()), uuid::Uuid::new_v4());
        let mut ai = AIController::new(64.0, 1.5);

        ai.acquire(target);
        assert_eq!(ai.state, AiState::Chasing);
        assert_eq!(ai.lose(), Some(target));
        assert_eq!(ai.state, AiState::Idle);
        assert!(ai.target.is_none());
    }
}
