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

//! Player control system: input-driven movement and target selection

use super::{System, SystemContext};
use crate::ecs::components::{Capability, Combatant, EntityId, Movement, Position, Role};
use crate::ecs::events::{EventBus, GameEvent};
use crate::ecs::registry::{EntityRegistry, EntitySnapshot};
use crate::error::SystemError;
use crate::pathfinding::TileGrid;
use dataevolved_common::Action;

/// Moves players according to the input snapshot and picks attack targets
///
/// Movement is resolved one axis at a time against the tile grid, so a
/// player pushing diagonally into a wall slides along it instead of stopping.
pub struct PlayerControlSystem {
    event_bus: EventBus,
}

impl PlayerControlSystem {
    /// Create a new player control system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Move by `(dx, dy)`, dropping each axis that would enter a blocked tile
    pub fn slide(grid: &TileGrid, from: Position, dx: f32, dy: f32) -> Position {
        let mut to = from;
        let along_x = Position::new(from.x + dx, from.y);
        if dx != 0.0 && grid.is_walkable_world(along_x.point()) {
            to = along_x;
        }
        let along_y = Position::new(to.x, to.y + dy);
        if dy != 0.0 && grid.is_walkable_world(along_y.point()) {
            to = along_y;
        }
        to
    }

    /// Hostile, targetable, living entity closest to `aim`
    fn pick_target(
        registry: &EntityRegistry,
        player: &EntitySnapshot,
        aim: Position,
    ) -> Option<EntityId> {
        registry
            .snapshot_all()
            .into_iter()
            .filter(|c| {
                c.is_alive()
                    && c.role.has(Capability::Targetable)
                    && player.role.is_hostile_to(c.role)
            })
            .map(|c| (c.position.distance(&aim), c.id))
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }
}

impl System for PlayerControlSystem {
    fn name(&self) -> &'static str {
        "player_control"
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
        let (ax, ay) = ctx.input.movement_axis();
        let moving = ax != 0.0 || ay != 0.0;
        let attacking = ctx.input.is_pressed(Action::Attack);
        if !moving && !attacking {
            return Ok(());
        }

        let players: Vec<EntitySnapshot> = ctx
            .registry
            .query_by_role(Role::Player)
            .filter(EntitySnapshot::is_alive)
            .collect();

        for player in players {
            let mut position = player.position;

            if moving {
                let speed = ctx.registry.component::<Movement>(player.id).map(|m| *m);
                if let Some(movement) = speed {
                    let step = movement.distance_per_step(ctx.time.step_ms);
                    let length = ax.hypot(ay);
                    position = Self::slide(ctx.grid, position, ax / length * step, ay / length * step);
                    if let Some(mut stored) = ctx.registry.component_mut::<Position>(player.id) {
                        *stored = position;
                    }
                }
            }

            if attacking {
                let aim = ctx
                    .input
                    .cursor
                    .map(|(x, y)| Position::new(x, y))
                    .unwrap_or(position);
                let target = Self::pick_target(ctx.registry, &player, aim);
                let changed = match ctx.registry.component_mut::<Combatant>(player.id) {
                    Some(mut combatant) if combatant.target != target => {
                        combatant.target = target;
                        true
                    }
                    _ => false,
                };
                if let (true, Some(target)) = (changed, target) {
                    self.event_bus.emit(
                        GameEvent::TargetAcquired {
                            entity: player.id,
                            target,
                        },
                        ctx.time.now_ms,
                        self.name(),
                    );
                }
            }
        }
        Ok(())
    }
}
