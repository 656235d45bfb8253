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

use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file; built-in defaults are used when omitted"
    )]
    pub config_file: Option<String>,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file",
        default_value = "engine/.env"
    )]
    pub env_file: Option<String>,

    #[arg(
        short = 's',
        long = "scenario",
        help = "Path to scenario file (map rows and spawns)",
        default_value = "engine/scenario.yaml"
    )]
    pub scenario_file: String,

    #[arg(long = "seconds", help = "Simulated seconds to run", default_value_t = 10.0)]
    pub seconds: f64,

    #[arg(long = "fps", help = "Simulated host frame rate", default_value_t = 60.0)]
    pub fps: f64,
}

impl Default for Arguments {
    fn default() -> Self {
        Self {
            config_file: None,
            env_file: Some(".env".to_string()),
            scenario_file: "scenario.yaml".to_string(),
            seconds: 10.0,
            fps: 60.0,
        }
    }
}

/// Errors raised while loading configuration or scenario files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Read and deserialize a YAML file
pub fn load_yaml<T, P>(path: P) -> Result<T, ConfigError>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_reader(file).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub simulation: SimulationConfig,
    pub ai: AiConfig,
    pub world: WorldConfig,
    pub log_filter: EnvField<LogFilter>,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigError> {
        load_yaml(path)
    }
}

/// Fixed-timestep loop settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation step in milliseconds
    pub fixed_step_ms: f64,
    /// Largest real-time delta credited per host frame
    pub max_frame_delta_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_step_ms: 1000.0 / 60.0,
            max_frame_delta_ms: 1000.0,
        }
    }
}

/// AI and combat tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// A target is dropped once farther than `aggro_range * aggro_loss_multiplier`
    pub aggro_loss_multiplier: f32,
    /// Attack cooldown for definitions that do not override it
    pub attack_cooldown_ms: f64,
    /// Maximum age of a planned route before it is recomputed
    pub repath_interval_ms: f64,
    /// Seed for loot rolls
    pub loot_seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            aggro_loss_multiplier: 1.5,
            attack_cooldown_ms: 1000.0,
            repath_interval_ms: 500.0,
            loot_seed: 0,
        }
    }
}

/// World geometry settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tiles beyond the grid edge an entity may stray before it is removed
    pub bounds_margin: f32,
    /// Distance within which a player collects an item
    pub pickup_radius: f32,
    /// Distance within which a player can interact with a world object
    pub interact_radius: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds_margin: 2.0,
            pickup_radius: 16.0,
            interact_radius: 32.0,
        }
    }
}

/// `tracing` filter directive used when `RUST_LOG` is unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFilter(String);

impl LogFilter {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for LogFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl Default for LogFilter {
    fn default() -> Self {
        Self(String::from("info"))
    }
}

impl std::fmt::Display for LogFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
