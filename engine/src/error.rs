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

//! Error taxonomy for the simulation core

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced to the host by the simulation core
#[derive(Debug, Error)]
pub enum SimError {
    /// A spawn request named a role the simulation does not know
    #[error("Unknown entity role: {0}")]
    UnknownRole(String),

    /// No live entity is registered under this UUID
    #[error("Entity not found: {0}")]
    EntityNotFound(Uuid),

    /// An entity with this UUID is already registered
    #[error("Entity {0} is already registered")]
    DuplicateEntity(Uuid),

    /// Map data could not be turned into a grid
    #[error("Invalid map: {0}")]
    InvalidMap(String),

    /// A system refused to initialize
    #[error("System '{name}' failed to initialize: {source}")]
    SystemInit {
        name: &'static str,
        #[source]
        source: SystemError,
    },

    /// `update_all` was called before `init_all`
    #[error("Systems must be initialized before they are updated")]
    SystemsNotInitialized,

    /// The loop is stopped or faulted
    #[error("Simulation loop is not running")]
    LoopNotRunning,

    /// A fault escaped the fixed-step update; the loop has stopped
    #[error("Simulation loop halted: {0}")]
    LoopFault(String),
}

/// Failure of a single system's update, isolated by the system registry
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("{0}")]
    Failed(String),

    #[error("Entity {0} vanished during update")]
    EntityVanished(Uuid),

    #[error(transparent)]
    Simulation(#[from] Box<SimError>),
}

impl From<SimError> for SystemError {
    fn from(err: SimError) -> Self {
        SystemError::Simulation(Box::new(err))
    }
}

/// Render a caught panic payload as text for logging
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        String::from("non-string panic payload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_error_wraps_sim_error() {
        let uuid = Uuid::new_v4();
        let err: SystemError = SimError::EntityNotFound(uuid).into();
        assert_eq!(err.to_string(), format!("Entity not found: {}", uuid));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
