//! Mope Arena - a predator/prey arena simulation
//!
//! Core modules:
//! - `sim`: Simulation (movement, sliding, AI, consumption and combat)
//! - `config`: Data-driven simulation tuning
//! - `persistence`: Save/load of the full world as a JSON snapshot
//! - `standings`: Leaderboard and run summary data for HUD collaborators

pub mod config;
pub mod persistence;
pub mod sim;
pub mod standings;

pub use config::{ConfigError, SimConfig};
pub use standings::{RunStats, Standing};

use glam::Vec2;

/// Simulation constants (defaults for `SimConfig`)
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Map dimensions (six 1920x1080 screens)
    pub const MAP_WIDTH: f32 = 1920.0 * 6.0;
    pub const MAP_HEIGHT: f32 = 1080.0 * 6.0;

    /// Radius of a level-0 entity; actual radius is `BASE_RADIUS + level`
    pub const BASE_RADIUS: f32 = 15.0;
    pub const PLAYER_SPEED: f32 = 10.0;
    /// 90% of player speed
    pub const CREATURE_SPEED: f32 = 9.0;
    /// Pointer offsets shorter than this don't move the player
    pub const PLAYER_DEAD_ZONE: f32 = 20.0;
    pub const MAX_HP: i32 = 100;

    /// AI detection ranges
    pub const FLEE_RANGE: f32 = 200.0;
    pub const HUNT_RANGE: f32 = 300.0;
    pub const FORAGE_RANGE: f32 = 300.0;
    /// Ticks a wander heading is held before re-randomizing
    pub const WANDER_INTERVAL_TICKS: u32 = 60;

    /// Fraction of attempted travel kept when sliding around a circle
    pub const SLIDE_FACTOR: f32 = 0.8;

    /// Flat damage dealt to the lower-level party on contact
    pub const CONTACT_DAMAGE: i32 = 20;
    /// Healing per point of nutrition eaten
    pub const HEAL_PER_NUTRITION: i32 = 2;

    /// Nutrition required to leave level 1
    pub const BASE_REQUIRED_NUTRITION: u32 = 20;
    /// Highest reachable level: the last one whose requirement fits in a `u32`
    pub const MAX_LEVEL: u32 = 48;
    /// Growth factor of the leveling curve (also the edible-threshold divisor)
    pub const NUTRITION_GROWTH: f64 = 1.5;

    /// Population
    pub const MIN_CREATURES: usize = 35;
    pub const INITIAL_FOODS: usize = 200;
    pub const INITIAL_OBSTACLES: usize = 50;
    pub const FOOD_SPAWN_CHANCE: f64 = 0.4;
    pub const SPAWN_MIN_OBSTACLE_DISTANCE: f32 = 40.0;
    pub const SPAWN_MIN_PLAYER_DISTANCE: f32 = 800.0;
    /// Clearance radius used when dropping food next to obstacles
    pub const FOOD_PLACEMENT_RADIUS: f32 = 15.0;
}

/// Unit vector for a heading angle (radians)
#[inline]
pub fn heading_to_vec(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Unit vector from `from` toward `to`, zero when the points coincide
#[inline]
pub fn direction_between(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
