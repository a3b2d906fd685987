//! PPU Configuration
//!
//! Options a host picks once when constructing the PPU.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::Byte;

/// Output value for each of the 4 palette slots, lightest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shades(pub [Byte; 4]);

impl Default for Shades {
    fn default() -> Self {
        Self([0xEB, 0xC4, 0x60, 0x00])
    }
}

impl Shades {
    /// Shade for a 2-bit palette slot
    pub fn shade(&self, slot: u8) -> Byte {
        self.0[(slot & 0x03) as usize]
    }

    /// The lightest shade, what a blank background shows
    pub fn lightest(&self) -> Byte {
        self.0[0]
    }
}

/// How overlapping sprites are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpritePriority {
    /// Draw every sprite on the line in OAM order; later entries overwrite
    #[default]
    OamOrder,
    /// DMG rules: first 10 sprites on the line, smaller X wins, then lower OAM index
    Hardware,
}

/// How `step` consumes a cycle count spanning several mode windows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPolicy {
    /// One threshold check per step; leftover cycles carry to the next call
    #[default]
    SingleThreshold,
    /// Keep transitioning until the mode clock is below the active threshold
    CatchUp,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PpuConfig {
    pub shades: Shades,
    pub sprite_priority: SpritePriority,
    pub clock_policy: ClockPolicy,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PpuConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
