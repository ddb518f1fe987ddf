//! Simulation tuning
//!
//! Defaults come from `crate::consts`; a JSON file may override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a config
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Map ===
    pub map_width: f32,
    pub map_height: f32,

    // === Entities ===
    pub base_radius: f32,
    pub player_speed: f32,
    pub creature_speed: f32,
    pub player_dead_zone: f32,

    // === AI ===
    pub flee_range: f32,
    pub hunt_range: f32,
    pub forage_range: f32,
    pub wander_interval_ticks: u32,

    // === Population ===
    pub min_creatures: usize,
    pub initial_foods: usize,
    pub initial_obstacles: usize,
    /// Probability of one food spawning per maintenance call
    pub food_spawn_chance: f64,
    pub spawn_min_obstacle_distance: f32,
    pub spawn_min_player_distance: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,

            base_radius: BASE_RADIUS,
            player_speed: PLAYER_SPEED,
            creature_speed: CREATURE_SPEED,
            player_dead_zone: PLAYER_DEAD_ZONE,

            flee_range: FLEE_RANGE,
            hunt_range: HUNT_RANGE,
            forage_range: FORAGE_RANGE,
            wander_interval_ticks: WANDER_INTERVAL_TICKS,

            min_creatures: MIN_CREATURES,
            initial_foods: INITIAL_FOODS,
            initial_obstacles: INITIAL_OBSTACLES,
            food_spawn_chance: FOOD_SPAWN_CHANCE,
            spawn_min_obstacle_distance: SPAWN_MIN_OBSTACLE_DISTANCE,
            spawn_min_player_distance: SPAWN_MIN_PLAYER_DISTANCE,
        }
    }
}

impl SimConfig {
    /// Load a config from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate a JSON config string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.map_width > 0.0 && self.map_height > 0.0) {
            return Err(ConfigError::Invalid("map dimensions must be positive"));
        }
        if self.base_radius < 0.0 {
            return Err(ConfigError::Invalid("base_radius must not be negative"));
        }
        // Largest level-1 body must still fit inside the map
        let min_side = self.map_width.min(self.map_height);
        if 2.0 * (self.base_radius + 1.0) > min_side {
            return Err(ConfigError::Invalid("map is too small for a level-1 entity"));
        }
        if self.player_speed < 0.0 || self.creature_speed < 0.0 {
            return Err(ConfigError::Invalid("speeds must not be negative"));
        }
        if self.player_dead_zone < 0.0 {
            return Err(ConfigError::Invalid("player_dead_zone must not be negative"));
        }
        if self.flee_range < 0.0 || self.hunt_range < 0.0 || self.forage_range < 0.0 {
            return Err(ConfigError::Invalid("detection ranges must not be negative"));
        }
        if self.wander_interval_ticks == 0 {
            return Err(ConfigError::Invalid("wander_interval_ticks must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.food_spawn_chance) {
            return Err(ConfigError::Invalid("food_spawn_chance must be within 0..=1"));
        }
        if self.spawn_min_obstacle_distance < 0.0 || self.spawn_min_player_distance < 0.0 {
            return Err(ConfigError::Invalid("spawn distances must not be negative"));
        }
        Ok(())
    }
}
