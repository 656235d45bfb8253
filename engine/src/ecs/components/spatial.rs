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

//! Spatial components for world position and movement

use crate::pathfinding::{GridPos, Path, WorldPoint};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Position in continuous world coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn point(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

impl From<WorldPoint> for Position {
    fn from(point: WorldPoint) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Movement capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// World units per second
    pub speed: f32,
}

impl Movement {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Distance covered in one step of `step_ms`
    pub fn distance_per_step(&self, step_ms: f64) -> f32 {
        self.speed * (step_ms / 1000.0) as f32
    }
}

/// Remaining waypoints toward an AI entity's chase target
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub waypoints: VecDeque<WorldPoint>,
    /// Grid cell the route was planned toward
    pub goal: Option<GridPos>,
    /// Time since the route was planned
    pub age_ms: f64,
}

impl Route {
    /// Replace the route with a freshly planned path, skipping the start cell
    pub fn replan(&mut self, path: &Path, goal: GridPos, destination: WorldPoint) {
        self.waypoints = path.points().skip(1).collect();
        if self.waypoints.is_empty() {
            self.waypoints.push_back(destination);
        }
        self.goal = Some(goal);
        self.age_ms = 0.0;
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.goal = None;
        self.age_ms = 0.0;
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Walk along the route for `budget` world units starting at `from`
    pub fn advance(&mut self, from: Position, mut budget: f32) -> Position {
        let mut position = from;
        while budget > 0.0 {
            let Some(next) = self.waypoints.front().copied() else {
                break;
            };
            let target = Position::from(next);
            let remaining = position.distance(&target);
            if remaining <= budget {
                position = target;
                budget -= remaining;
                self.waypoints.pop_front();
            } else {
                let ratio = budget / remaining;
                position.x += (target.x - position.x) * ratio;
                position.y += (target.y - position.y) * ratio;
                budget = 0.0;
            }
        }
        position
    }
}
