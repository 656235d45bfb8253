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

//! Core stat block shared by every entity

use dataevolved_common::{EffectStat, StatBlock};
use serde::{Deserialize, Serialize};

/// Power, resources, and combat stats
///
/// Power is always kept within `[0, max_power]`. Once an entity is
/// defeated it stays defeated. A block with zero power starts defeated;
/// afterwards only the combat damage path flips the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    power: u32,
    max_power: u32,
    pub memory: u32,
    pub firewall: u32,
    pub ghz: u32,
    defeated: bool,
}

impl Stats {
    pub fn new(power: u32, max_power: u32) -> Self {
        Self::from(StatBlock {
            power,
            max_power,
            ..StatBlock::default()
        })
    }

    pub fn with_combat(mut self, ghz: u32, firewall: u32) -> Self {
        self.ghz = ghz;
        self.firewall = firewall;
        self
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn max_power(&self) -> u32 {
        self.max_power
    }

    /// Set power, clamped to `[0, max_power]`; returns the stored value
    pub fn set_power(&mut self, power: u32) -> u32 {
        self.power = power.min(self.max_power);
        self.power
    }

    /// Set max power, re-clamping current power
    pub fn set_max_power(&mut self, max_power: u32) {
        self.max_power = max_power;
        self.power = self.power.min(max_power);
    }

    pub fn is_alive(&self) -> bool {
        !self.defeated
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub(crate) fn mark_defeated(&mut self) {
        self.power = 0;
        self.defeated = true;
    }

    pub fn get(&self, stat: EffectStat) -> u32 {
        match stat {
            EffectStat::Firewall => self.firewall,
            EffectStat::Ghz => self.ghz,
            EffectStat::Memory => self.memory,
        }
    }

    pub fn set(&mut self, stat: EffectStat, value: u32) {
        match stat {
            EffectStat::Firewall => self.firewall = value,
            EffectStat::Ghz => self.ghz = value,
            EffectStat::Memory => self.memory = value,
        }
    }

    pub fn to_block(&self) -> StatBlock {
        StatBlock {
            power: self.power,
            max_power: self.max_power,
            memory: self.memory,
            firewall: self.firewall,
            ghz: self.ghz,
        }
    }
}

/// A block whose clamped power is zero yields an already defeated entity
impl From<StatBlock> for Stats {
    fn from(block: StatBlock) -> Self {
        let power = block.power.min(block.max_power);
        Self {
            power,
            max_power: block.max_power,
            memory: block.memory,
            firewall: block.firewall,
            ghz: block.ghz,
            defeated: power == 0,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::from(StatBlock::default())
    }
}
