//! Fixed timestep simulation tick
//!
//! Advances the world by one step: player movement, creature decisions and
//! movement, then consumption and combat.

use glam::Vec2;

use super::combat::resolve_interactions;
use super::movement::{move_creatures, move_player};
use super::state::{Phase, SimEvent, World};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Pointer offset from the screen center
    pub pointer: Vec2,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub game_over: bool,
    /// Level of the creature that killed the player
    pub killer_level: Option<u32>,
    /// Foods the player ate this tick
    pub food_eaten_delta: u32,
    pub events: Vec<SimEvent>,
}

/// Advance the world by one fixed timestep.
///
/// A finished world is left untouched and keeps reporting game over.
pub fn tick(world: &mut World, input: &TickInput) -> TickResult {
    if let Phase::GameOver { killer_level } = world.phase {
        return TickResult {
            game_over: true,
            killer_level: Some(killer_level),
            ..Default::default()
        };
    }

    world.time_ticks += 1;

    move_player(world, input.pointer);
    move_creatures(world);

    let mut events = Vec::new();
    let resolution = resolve_interactions(world, &mut events);

    if let Some(level) = resolution.killer_level {
        log::info!(
            "Player killed at tick {} by a level {} creature",
            world.time_ticks,
            level
        );
    }

    TickResult {
        game_over: resolution.killer_level.is_some(),
        killer_level: resolution.killer_level,
        food_eaten_delta: resolution.food_eaten,
        events,
    }
}
