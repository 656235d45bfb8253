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

//! Path following system: moves AI entities along A* routes to their targets

use super::{System, SystemContext};
use crate::config::AiConfig;
use crate::ecs::components::{
    AIController, AiState, Combatant, EntityId, EntityUuid, Movement, Position, Route, Stats,
};
use crate::error::SystemError;
use crate::pathfinding::find_path;
use hecs::Entity;

/// Chases AI targets over the tile grid
///
/// A route is replanned when the target moves into a different grid cell,
/// when the route runs out, or when it is older than the repath interval.
/// If no path exists the entity holds position.
pub struct PathFollowingSystem {
    repath_interval_ms: f64,
}

struct Mover {
    id: EntityId,
    position: Position,
    movement: Movement,
    target: Option<EntityId>,
    attack_range: f32,
}

impl PathFollowingSystem {
    /// Create a new path following system
    pub fn new(config: &AiConfig) -> Self {
        Self {
            repath_interval_ms: config.repath_interval_ms,
        }
    }

    fn set_state(ctx: &SystemContext<'_>, id: EntityId, state: AiState) {
        if let Some(mut ai) = ctx.registry.component_mut::<AIController>(id) {
            ai.state = state;
        }
    }
}

impl System for PathFollowingSystem {
    fn name(&self) -> &'static str {
        "path_following"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let movers: Vec<Mover> = {
            let registry = &*ctx.registry;
            let mut query = registry.world().query::<(
                Entity,
                &EntityUuid,
                &Position,
                &Stats,
                &Movement,
                &AIController,
                Option<&Combatant>,
            )>();
            query
                .iter()
                .filter(|(entity, _, _, stats, ..)| {
                    stats.is_alive() && !registry.is_pending_removal(*entity)
                })
                .map(|(entity, uuid, position, _, movement, ai, combatant)| Mover {
                    id: uuid.id(entity),
                    position: *position,
                    movement: *movement,
                    target: ai.target,
                    attack_range: combatant.map(|c| c.attack_range).unwrap_or(0.0),
                })
                .collect()
        };

        for mover in movers {
            let goal = mover
                .target
                .and_then(|target| ctx.registry.get(target))
                .filter(|snapshot| snapshot.is_alive())
                .map(|snapshot| snapshot.position);

            let next_position = {
                let Some(mut route) = ctx.registry.component_mut::<Route>(mover.id) else {
                    continue;
                };
                let Some(goal) = goal else {
                    route.clear();
                    continue;
                };
                if mover.position.distance(&goal) <= mover.attack_range {
                    route.clear();
                    drop(route);
                    Self::set_state(ctx, mover.id, AiState::Attacking);
                    continue;
                }

                let goal_cell = ctx.grid.world_to_grid(goal.point());
                route.age_ms += ctx.time.step_ms;
                let stale = route.goal != Some(goal_cell)
                    || route.is_empty()
                    || route.age_ms >= self.repath_interval_ms;
                if stale {
                    match find_path(mover.position.point(), goal.point(), ctx.grid) {
                        Ok(path) => route.replan(&path, goal_cell, goal.point()),
                        Err(err) => {
                            tracing::trace!("Entity {} holds position: {}", mover.id, err);
                            route.clear();
                            continue;
                        }
                    }
                }
                route.advance(
                    mover.position,
                    mover.movement.distance_per_step(ctx.time.step_ms),
                )
            };

            if let Some(mut position) = ctx.registry.component_mut::<Position>(mover.id) {
                *position = next_position;
            }
            Self::set_state(ctx, mover.id, AiState::Chasing);
        }
        Ok(())
    }
}
