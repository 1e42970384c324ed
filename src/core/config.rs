//! Tunable encounter parameters.
//!
//! Defaults come from [`crate::core::constants`]. A JSON file may override any
//! subset of fields; absent fields keep their defaults.

use super::constants::*;
use crate::entities::Bounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read game config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid game config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub enemy_spawn_interval_ms: u64,
    pub level_duration_ms: u64,
    pub regen_interval_ms: u64,
    pub boss_interval: u32,
    pub perk_interval: u32,
    pub powerup_drop_chance: f64,
    pub powerup_lifetime_ms: u64,
    pub projectile_lifetime_ms: u64,
    pub initial_enemies: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            enemy_spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            level_duration_ms: LEVEL_DURATION_MS,
            regen_interval_ms: REGEN_INTERVAL_MS,
            boss_interval: BOSS_INTERVAL,
            perk_interval: PERK_INTERVAL,
            powerup_drop_chance: POWERUP_DROP_CHANCE,
            powerup_lifetime_ms: POWERUP_LIFETIME_MS,
            projectile_lifetime_ms: PROJECTILE_LIFETIME_MS,
            initial_enemies: INITIAL_ENEMIES,
        }
    }
}

impl GameConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn arena_bounds(&self) -> Bounds {
        Bounds::new(self.arena_width, self.arena_height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            ("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms),
            ("level_duration_ms", self.level_duration_ms),
            ("regen_interval_ms", self.regen_interval_ms),
            ("powerup_lifetime_ms", self.powerup_lifetime_ms),
            ("projectile_lifetime_ms", self.projectile_lifetime_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be greater than zero")));
            }
        }
        if self.boss_interval == 0 || self.perk_interval == 0 {
            return Err(ConfigError::Invalid(
                "boss_interval and perk_interval must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.powerup_drop_chance) {
            return Err(ConfigError::Invalid(format!(
                "powerup_drop_chance {} is outside [0, 1]",
                self.powerup_drop_chance
            )));
        }
        let min_side = 2.0 * SPAWN_EDGE_MARGIN;
        if self.arena_width <= min_side || self.arena_height <= min_side {
            return Err(ConfigError::Invalid(format!(
                "arena {}x{} is too small",
                self.arena_width, self.arena_height
            )));
        }
        Ok(())
    }
}
