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

//! System lifecycle and ordered execution

use crate::ecs::registry::EntityRegistry;
use crate::error::{SimError, SystemError, panic_message};
use crate::pathfinding::TileGrid;
use dataevolved_common::InputSnapshot;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Simulation clock values for the step being executed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimTime {
    /// Simulation time at the start of this step
    pub now_ms: f64,
    /// Length of the step
    pub step_ms: f64,
    /// Number of steps completed before this one
    pub tick: u64,
}

impl SimTime {
    pub fn step_seconds(&self) -> f32 {
        (self.step_ms / 1000.0) as f32
    }
}

/// Everything a system may read or change during one step
pub struct SystemContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub grid: &'a TileGrid,
    pub input: &'a InputSnapshot,
    pub time: SimTime,
}

/// Unit of simulation logic run once per fixed step
///
/// Systems hold their own collaborators (usually a clone of the event bus)
/// and receive the world through [`SystemContext`].
pub trait System: Send {
    fn name(&self) -> &'static str;

    /// Called once before the first update
    fn init(&mut self) -> Result<(), SystemError> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>) -> Result<(), SystemError>;

    /// Called once when the registry shuts down
    fn destroy(&mut self) {}
}

/// Lifecycle state of a registered system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    Registered,
    Active,
    Destroyed,
}

struct SystemSlot {
    system: Box<dyn System>,
    state: SystemState,
    faults: u64,
}

/// Outcome of one [`SystemRegistry::update_all`] pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub ran: usize,
    pub faults: usize,
}

/// Ordered collection of systems
///
/// Systems run in registration order every step. A system that returns an
/// error or panics is logged and counted; the remaining systems still run.
#[derive(Default)]
pub struct SystemRegistry {
    slots: Vec<SystemSlot>,
    initialized: bool,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system to the execution order
    pub fn register<S: System + 'static>(&mut self, system: S) {
        self.register_boxed(Box::new(system));
    }

    pub fn register_boxed(&mut self, system: Box<dyn System>) {
        tracing::debug!("Registered system '{}'", system.name());
        self.slots.push(SystemSlot {
            system,
            state: SystemState::Registered,
            faults: 0,
        });
    }

    /// Initialize every system that has not been initialized yet
    pub fn init_all(&mut self) -> Result<(), SimError> {
        for slot in &mut self.slots {
            if slot.state != SystemState::Registered {
                continue;
            }
            slot.system.init().map_err(|source| SimError::SystemInit {
                name: slot.system.name(),
                source,
            })?;
            slot.state = SystemState::Active;
        }
        self.initialized = true;
        Ok(())
    }

    /// Run every active system once, in registration order
    pub fn update_all(&mut self, ctx: &mut SystemContext<'_>) -> Result<UpdateReport, SimError> {
        if !self.initialized {
            return Err(SimError::SystemsNotInitialized);
        }

        let mut report = UpdateReport::default();
        for slot in &mut self.slots {
            if slot.state != SystemState::Active {
                continue;
            }
            let name = slot.system.name();
            let result = catch_unwind(AssertUnwindSafe(|| slot.system.update(ctx)));
            let failure = match result {
                Ok(Ok(())) => None,
                Ok(Err(err)) => Some(err.to_string()),
                Err(payload) => Some(format!("panicked: {}", panic_message(payload.as_ref()))),
            };
            report.ran += 1;
            if let Some(reason) = failure {
                slot.faults += 1;
                report.faults += 1;
                metrics::counter!("sim.system_faults", "system" => name).increment(1);
                tracing::error!("System '{}' failed at tick {}: {}", name, ctx.time.tick, reason);
            }
        }
        Ok(report)
    }

    /// Destroy every active system in reverse registration order
    pub fn destroy_all(&mut self) {
        for slot in self.slots.iter_mut().rev() {
            if slot.state == SystemState::Active {
                slot.system.destroy();
            }
            slot.state = SystemState::Destroyed;
        }
        self.initialized = false;
    }

    /// System names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.system.name()).collect()
    }

    pub fn state_of(&self, name: &str) -> Option<SystemState> {
        self.slots
            .iter()
            .find(|slot| slot.system.name() == name)
            .map(|slot| slot.state)
    }

    /// Faults recorded for a system since registration
    pub fn fault_count(&self, name: &str) -> u64 {
        self.slots
            .iter()
            .filter(|slot| slot.system.name() == name)
            .map(|slot| slot.faults)
            .sum()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        name: &'static str,
        log: Log,
        behavior: Behavior,
    }

    #[derive(Clone, Copy)]
    enum Behavior {
        Ok,
        Fail,
        Panic,
        RefuseInit,
    }

    impl System for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn init(&mut self) -> Result<(), SystemError> {
            self.log.lock().unwrap().push(format!("init {}", self.name));
            match self.behavior {
                Behavior::RefuseInit => Err(SystemError::Failed("no".into())),
                _ => Ok(()),
            }
        }

        fn update(&mut self, _ctx: &mut SystemContext<'_>) -> Result<(), SystemError> {
            self.log.lock().unwrap().push(format!("update {}", self.name));
            match self.behavior {
                Behavior::Fail => Err(SystemError::Failed("broken".into())),
                Behavior::Panic => panic!("system blew up"),
                _ => Ok(()),
            }
        }

        fn destroy(&mut self) {
            self.log.lock().unwrap().push(format!("destroy {}", self.name));
        }
    }

    fn recorder(name: &'static str, log: &Log, behavior: Behavior) -> Recorder {
        Recorder {
            name,
            log: Arc::clone(log),
            behavior,
        }
    }

    fn run_once(systems: &mut SystemRegistry) -> Result<UpdateReport, SimError> {
        let mut registry = EntityRegistry::new();
        let grid = TileGrid::new(4, 4, 16.0, 16.0);
        let input = InputSnapshot::default();
        let mut ctx = SystemContext {
            registry: &mut registry,
            grid: &grid,
            input: &input,
            time: SimTime {
                now_ms: 0.0,
                step_ms: 10.0,
                tick: 0,
            },
        };
        systems.update_all(&mut ctx)
    }

    #[test]
    fn test_update_before_init_is_rejected() {
        let log = Log::default();
        let mut systems = SystemRegistry::new();
        systems.register(recorder("a", &log, Behavior::Ok));

        assert!(matches!(run_once(&mut systems), Err(SimError::SystemsNotInitialized)));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_lifecycle_order() {
        let log = Log::default();
        let mut systems = SystemRegistry::new();
        systems.register(recorder("a", &log, Behavior::Ok));
        systems.register(recorder("b", &log, Behavior::Ok));

        systems.init_all().unwrap();
        run_once(&mut systems).unwrap();
        systems.destroy_all();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["init a", "init b", "update a", "update b", "destroy b", "destroy a"]
        );
        assert_eq!(systems.state_of("a"), Some(SystemState::Destroyed));
        assert!(!systems.is_initialized());
    }

    #[test]
    fn test_faulting_systems_are_isolated() {
        let log = Log::default();
        let mut systems = SystemRegistry::new();
        systems.register(recorder("failing", &log, Behavior::Fail));
        systems.register(recorder("panicking", &log, Behavior::Panic));
        systems.register(recorder("healthy", &log, Behavior::Ok));
        systems.init_all().unwrap();

        let report = run_once(&mut systems).unwrap();
        assert_eq!(report, UpdateReport { ran: 3, faults: 2 });
        assert!(log.lock().unwrap().contains(&"update healthy".to_string()));
        assert_eq!(systems.fault_count("failing"), 1);
        assert_eq!(systems.fault_count("panicking"), 1);
        assert_eq!(systems.fault_count("healthy"), 0);

        // Faulting systems keep running on later steps
        let report = run_once(&mut systems).unwrap();
        assert_eq!(report.faults, 2);
    }

    #[test]
    fn test_init_failure_names_the_system() {
        let log = Log::default();
        let mut systems = SystemRegistry::new();
        systems.register(recorder("ok", &log, Behavior::Ok));
        systems.register(recorder("stubborn", &log, Behavior::RefuseInit));

        let err = systems.init_all().unwrap_err();
        assert!(matches!(err, SimError::SystemInit { name: "stubborn", .. }));
        assert_eq!(systems.state_of("ok"), Some(SystemState::Active));
        assert_eq!(systems.state_of("stubborn"), Some(SystemState::Registered));
        assert!(!systems.is_initialized());
    }

    #[test]
    fn test_names_in_execution_order() {
        let log = Log::default();
        let mut systems = SystemRegistry::new();
        systems.register(recorder("first", &log, Behavior::Ok));
        systems.register(recorder("second", &log, Behavior::Ok));
        assert_eq!(systems.names(), vec!["first", "second"]);
        assert_eq!(systems.len(), 2);
    }
}
