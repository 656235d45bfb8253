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

//! Game client facade
//!
//! [`GameClient`] is the single object a host embeds. It owns the entity
//! registry, the ordered systems, the event bus, and the fixed-timestep
//! clock, and exposes tick/render entry points plus event subscription.

use crate::clock::{ClockState, FixedTimestep};
use crate::combat::apply_damage;
use crate::config::{AiConfig, Configuration, WorldConfig};
use crate::ecs::components::{Capability, EntityId, Position, Role, Stats};
use crate::ecs::events::{Event, EventBus, EventType, GameEvent, SubscriptionId};
use crate::ecs::registry::{DespawnReason, EntityRegistry, EntitySnapshot};
use crate::ecs::spawner::EntitySpawner;
use crate::ecs::systems::{
    AiTargetingSystem, CombatSystem, DeathLootSystem, InteractionSystem, PathFollowingSystem,
    PlayerControlSystem, SimTime, StatusEffectSystem, System, SystemContext, SystemRegistry,
    WorldBoundsSystem,
};
use crate::error::SimError;
use crate::pathfinding::TileGrid;
use dataevolved_common::{EntityDefinition, InputSnapshot, MapData, SpawnRequest, StatePatch};

/// Drawing target supplied by the host
///
/// `render` calls `begin_frame` once, `draw` for every renderable entity,
/// then `end_frame` once. `alpha` is the fraction of a fixed step left in
/// the accumulator, for interpolating between simulation states.
pub trait RenderSurface {
    fn begin_frame(&mut self, _alpha: f64) {}

    fn draw(&mut self, entity: &EntitySnapshot);

    fn end_frame(&mut self) {}
}

/// What one `tick` did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub steps: u32,
    pub clamped: bool,
    pub alpha: f64,
    pub patches_applied: usize,
    pub patches_rejected: usize,
    pub system_faults: usize,
    pub despawned: usize,
}

/// Real-time simulation facade
pub struct GameClient {
    ai: AiConfig,
    clock: FixedTimestep,
    event_bus: EventBus,
    registry: EntityRegistry,
    systems: SystemRegistry,
    grid: TileGrid,
    spawner: EntitySpawner,
    pending_patches: Vec<StatePatch>,
    sim_time_ms: f64,
    tick_count: u64,
}

impl GameClient {
    /// Create a client with no systems registered
    pub fn new(config: &Configuration, grid: TileGrid) -> Self {
        Self {
            ai: config.ai,
            clock: FixedTimestep::from_config(&config.simulation),
            event_bus: EventBus::new(),
            registry: EntityRegistry::new(),
            systems: SystemRegistry::new(),
            grid,
            spawner: EntitySpawner::new(config.ai),
            pending_patches: Vec::new(),
            sim_time_ms: 0.0,
            tick_count: 0,
        }
    }

    /// Create a client with the standard systems in their execution order:
    /// player control, AI targeting, path following, combat, status effects,
    /// death and loot, interaction, world bounds
    pub fn with_default_systems(config: &Configuration, grid: TileGrid) -> Self {
        let mut client = Self::new(config, grid);
        client.register_default_systems(&config.ai, &config.world);
        client
    }

    /// Build the grid from map data and spawn its entities
    pub fn from_map(config: &Configuration, map: &MapData) -> Result<Self, SimError> {
        let grid = TileGrid::from_map(map)?;
        let mut client = Self::with_default_systems(config, grid);
        for request in &map.spawns {
            client.spawn(request)?;
        }
        tracing::info!(
            "Loaded {}x{} map with {} entities",
            client.grid.width(),
            client.grid.height(),
            client.registry.len()
        );
        Ok(client)
    }

    fn register_default_systems(&mut self, ai: &AiConfig, world: &WorldConfig) {
        let bus = &self.event_bus;
        self.systems.register(PlayerControlSystem::new(bus.clone()));
        self.systems.register(AiTargetingSystem::new(bus.clone()));
        self.systems.register(PathFollowingSystem::new(ai));
        self.systems.register(CombatSystem::new(bus.clone()));
        self.systems.register(StatusEffectSystem::new(bus.clone()));
        self.systems.register(DeathLootSystem::new(bus.clone(), ai));
        self.systems.register(InteractionSystem::new(bus.clone(), world));
        self.systems.register(WorldBoundsSystem::new(world));
    }

    /// Append a system after those already registered
    pub fn register_system<S: System + 'static>(&mut self, system: S) {
        self.systems.register(system);
    }

    /// Initialize pending systems and start the clock at `now_ms`
    pub fn start(&mut self, now_ms: f64) -> Result<(), SimError> {
        self.systems.init_all()?;
        self.clock.start(now_ms);
        tracing::info!("Simulation started with systems {:?}", self.systems.names());
        Ok(())
    }

    /// Pause the clock; systems stay initialized
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// Stop the clock and destroy every system
    pub fn shutdown(&mut self) {
        self.clock.stop();
        self.systems.destroy_all();
        tracing::info!(
            "Simulation shut down after {} steps ({:.0}ms simulated)",
            self.tick_count,
            self.sim_time_ms
        );
    }

    /// Advance the simulation to real time `now_ms`
    ///
    /// Queued state patches are applied first, then zero or more fixed steps
    /// run. Each step updates every system in order and then despawns the
    /// entities marked for removal during that step.
    pub fn tick(&mut self, now_ms: f64, input: &InputSnapshot) -> Result<TickReport, SimError> {
        if !self.clock.is_running() {
            return Err(SimError::LoopNotRunning);
        }

        let (patches_applied, patches_rejected) = self.apply_patches();

        let Self {
            clock,
            systems,
            registry,
            grid,
            event_bus,
            sim_time_ms,
            tick_count,
            ..
        } = self;
        let mut system_faults = 0;
        let mut despawned = 0;

        let frame = clock.on_frame(now_ms, |step_ms| {
            let mut ctx = SystemContext {
                registry: &mut *registry,
                grid: &*grid,
                input,
                time: SimTime {
                    now_ms: *sim_time_ms,
                    step_ms,
                    tick: *tick_count,
                },
            };
            let report = systems.update_all(&mut ctx)?;
            system_faults += report.faults;

            *sim_time_ms += step_ms;
            *tick_count += 1;

            for (entity, reason) in registry.flush() {
                despawned += 1;
                event_bus.emit(
                    GameEvent::EntityDespawned { entity, reason },
                    *sim_time_ms,
                    "registry",
                );
            }
            Ok(())
        })?;

        metrics::counter!("sim.steps").increment(u64::from(frame.steps));
        metrics::gauge!("sim.entities").set(self.registry.len() as f64);
        if frame.clamped {
            metrics::counter!("sim.frames_clamped").increment(1);
        }

        Ok(TickReport {
            steps: frame.steps,
            clamped: frame.clamped,
            alpha: frame.alpha,
            patches_applied,
            patches_rejected,
            system_faults,
            despawned,
        })
    }

    /// Draw every renderable entity to `surface`
    pub fn render<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        surface.begin_frame(self.clock.alpha());
        for snapshot in self.registry.snapshot_all() {
            if snapshot.role.has(Capability::Renderable) {
                surface.draw(&snapshot);
            }
        }
        surface.end_frame();
    }

    /// One host frame: tick, then render exactly once
    pub fn frame<S: RenderSurface + ?Sized>(
        &mut self,
        now_ms: f64,
        input: &InputSnapshot,
        surface: &mut S,
    ) -> Result<TickReport, SimError> {
        let report = self.tick(now_ms, input)?;
        self.render(surface);
        Ok(report)
    }

    /// Subscribe a host handler to one event type
    pub fn subscribe<F>(&self, event_type: EventType, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.event_bus.subscribe(event_type, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.event_bus.unsubscribe(id)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Spawn an entity of `role` at `(x, y)`
    pub fn spawn_entity(
        &mut self,
        role: Role,
        x: f32,
        y: f32,
        definition: &EntityDefinition,
    ) -> Result<EntityId, SimError> {
        self.spawner.spawn(
            &mut self.registry,
            &self.event_bus,
            role,
            x,
            y,
            definition,
            self.sim_time_ms,
        )
    }

    /// Spawn from a content request; unknown roles are rejected
    pub fn spawn(&mut self, request: &SpawnRequest) -> Result<EntityId, SimError> {
        self.spawner
            .spawn_request(&mut self.registry, &self.event_bus, request, self.sim_time_ms)
    }

    /// Remove an entity at the end of the next step
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.registry.destroy(id, DespawnReason::Explicit)
    }

    /// Queue an authoritative patch for the start of the next tick
    pub fn queue_patch(&mut self, patch: StatePatch) {
        self.pending_patches.push(patch);
    }

    fn apply_patches(&mut self) -> (usize, usize) {
        let patches = std::mem::take(&mut self.pending_patches);
        let mut applied = 0;
        let mut rejected = 0;
        for patch in patches {
            match self.apply_patch(&patch) {
                Ok(()) => applied += 1,
                Err(err) => {
                    rejected += 1;
                    metrics::counter!("sim.patches_rejected").increment(1);
                    tracing::warn!("Rejected state patch: {}", err);
                }
            }
        }
        (applied, rejected)
    }

    /// Overwrite entity state from an authoritative source
    ///
    /// A defeated entity is never revived. Lowering power to zero goes
    /// through the damage path so `EntityDied` is still published.
    fn apply_patch(&mut self, patch: &StatePatch) -> Result<(), SimError> {
        let id = self
            .registry
            .resolve(patch.entity)
            .ok_or(SimError::EntityNotFound(patch.entity))?;

        if let Some((x, y)) = patch.position {
            if let Some(mut position) = self.registry.component_mut::<Position>(id) {
                *position = Position::new(x, y);
            }
        }

        let lethal = match self.registry.component_mut::<Stats>(id) {
            Some(mut stats) if stats.is_alive() => {
                if let Some(max_power) = patch.max_power {
                    stats.set_max_power(max_power);
                }
                if let Some(memory) = patch.memory {
                    stats.memory = memory;
                }
                if let Some(firewall) = patch.firewall {
                    stats.firewall = firewall;
                }
                if let Some(ghz) = patch.ghz {
                    stats.ghz = ghz;
                }
                match patch.power {
                    Some(0) => true,
                    Some(power) => {
                        stats.set_power(power);
                        stats.power() == 0
                    }
                    None => stats.power() == 0,
                }
            }
            Some(_) => {
                if patch.touches_stats() {
                    tracing::debug!("Ignoring stat patch for defeated entity {}", id);
                }
                false
            }
            None => false,
        };

        if lethal {
            let remaining = self
                .registry
                .component::<Stats>(id)
                .map(|stats| stats.power())
                .unwrap_or(0);
            apply_damage(
                &self.registry,
                &self.event_bus,
                id,
                remaining.max(1),
                None,
                self.sim_time_ms,
            );
        }

        if patch.remove {
            self.registry.destroy(id, DespawnReason::Authoritative);
        }

        self.event_bus.emit(
            GameEvent::StatePatched { entity: id },
            self.sim_time_ms,
            "sync",
        );
        Ok(())
    }

    /// Snapshot of every entity
    pub fn snapshot(&self) -> Vec<EntitySnapshot> {
        self.registry.snapshot_all()
    }

    pub fn get(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.registry.get(id)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    /// Simulated time elapsed across all fixed steps
    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.names()
    }
}
