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
use dataevolved_engine::client::{GameClient, RenderSurface};
use dataevolved_engine::config::{Arguments, Configuration};
use dataevolved_engine::ecs::events::{EventType, GameEvent};
use dataevolved_engine::ecs::registry::EntitySnapshot;
use dataevolved_engine::scenario::Scenario;
use tracing_subscriber::EnvFilter;

/// Headless surface that only counts what would be drawn
#[derive(Debug, Default)]
struct CountingSurface {
    frames: u64,
    draws: u64,
}

impl RenderSurface for CountingSurface {
    fn begin_frame(&mut self, _alpha: f64) {
        self.frames += 1;
    }

    fn draw(&mut self, _entity: &EntitySnapshot) {
        self.draws += 1;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            dotenv::from_filename(env_file).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }

    // Load configuration, falling back to built-in defaults
    let config: Configuration = match arguments.config_file {
        Some(ref path) => Configuration::load(path)?,
        None => Configuration::default(),
    };

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_ansi(true)
        .init();

    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Data Evolved simulation...");

    let scenario = Scenario::load(&arguments.scenario_file)?;
    let mut client = GameClient::from_map(&config, &scenario.map)?;

    client.subscribe(EventType::EntityDied, |event| {
        if let GameEvent::EntityDied { entity, killer } = &event.payload {
            match killer {
                Some(killer) => tracing::info!("{} was defeated by {}", entity, killer),
                None => tracing::info!("{} was defeated", entity),
            }
        }
    });
    client.subscribe(EventType::ItemDropped, |event| {
        if let GameEvent::ItemDropped { item_id, source, .. } = &event.payload {
            tracing::info!("{} dropped {}", source, item_id);
        }
    });
    client.subscribe(EventType::ExperienceGained, |event| {
        if let GameEvent::ExperienceGained { entity, amount, total } = &event.payload {
            tracing::info!("{} gained {} experience ({} total)", entity, amount, total);
        }
    });
    client.subscribe(EventType::ItemPickedUp, |event| {
        if let GameEvent::ItemPickedUp {
            entity,
            item_id,
            quantity,
            ..
        } = &event.payload
        {
            tracing::info!("{} picked up {} x{}", entity, item_id, quantity);
        }
    });

    let frame_ms = 1000.0 / arguments.fps.max(1.0);
    let end_ms = arguments.seconds.max(0.0) * 1000.0;
    let mut surface = CountingSurface::default();
    let mut now_ms = 0.0;

    client.start(now_ms)?;
    while now_ms < end_ms {
        now_ms += frame_ms;
        let input = scenario.input_at(now_ms);
        let report = client.frame(now_ms, &input, &mut surface)?;
        if report.system_faults > 0 || report.patches_rejected > 0 {
            tracing::warn!("Frame at {:.0}ms: {:?}", now_ms, report);
        }
    }
    client.shutdown();

    tracing::info!(
        "Rendered {} frames ({} draws), {} published events",
        surface.frames,
        surface.draws,
        client.event_bus().published_count()
    );
    println!("{}", serde_json::to_string_pretty(&client.snapshot())?);

    Ok(())
}
