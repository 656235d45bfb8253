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

//! Map and tile data produced by map loading

use crate::definition::SpawnRequest;
use serde::{Deserialize, Serialize};

/// Character marking a non-walkable tile in [`MapData::rows`]
pub const BLOCKED_TILE: char = '#';

/// Tile map as delivered by the map loader
///
/// Each row is one line of tiles, top to bottom. `#` marks a blocked tile,
/// every other character is walkable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub tile_width: f32,
    pub tile_height: f32,
    pub rows: Vec<String>,
    #[serde(default)]
    pub spawns: Vec<SpawnRequest>,
}

impl MapData {
    /// Build a map from ASCII rows
    pub fn from_rows<S: AsRef<str>>(tile_width: f32, tile_height: f32, rows: &[S]) -> Self {
        Self {
            tile_width,
            tile_height,
            rows: rows.iter().map(|r| r.as_ref().to_string()).collect(),
            spawns: Vec::new(),
        }
    }

    /// Width in tiles of the widest row
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let map = MapData::from_rows(16.0, 16.0, &["....", ".##.", "...."]);
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
        assert!(map.spawns.is_empty());
    }

    #[test]
    fn test_map_from_yaml() {
        let yaml = "tile_width: 32\ntile_height: 32\nrows:\n  - '...'\n  - '.#.'\nspawns:\n  - role: player\n    x: 16\n    y: 16\n";
        let map: MapData = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(map.tile_width, 32.0);
        assert_eq!(map.rows[1], ".#.");
        assert_eq!(map.spawns.len(), 1);
        assert_eq!(map.spawns[0].definition.name, "unnamed");
    }
}
