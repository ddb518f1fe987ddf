//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod combat;
pub mod layout;
pub mod leveling;
pub mod movement;
pub mod slide;
pub mod spawn;
pub mod state;
pub mod tick;

pub use ai::Decision;
pub use collision::{circle_rect_overlap, circles_overlap};
pub use leveling::{can_eat, edible_threshold, level_progress, required_nutrition};
pub use slide::resolve_slide;
pub use spawn::{PopulationReport, find_safe_spawn_position, maintain_population};
pub use state::{
    Actor, AiState, Body, Creature, Food, MapBounds, Obstacle, ObstacleShape, Phase, Player,
    RngState, SimEvent, Stats, Target, World,
};
pub use tick::{TickInput, TickResult, tick};
