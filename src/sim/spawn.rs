//! Population maintenance
//!
//! Spawn-point search plus the routines that keep creatures and food
//! topped up between ticks.

use glam::Vec2;
use rand::Rng;

use super::state::{MapBounds, Obstacle, World};
use crate::consts::FOOD_PLACEMENT_RADIUS;

/// Random samples tried before falling back to the least-crowded point
pub const SAFE_SPAWN_SAMPLES: u32 = 1000;
/// Samples used by the fallback search
pub const FALLBACK_SAMPLES: u32 = 100;
/// Attempts `spawn_creatures` makes per call
pub const CREATURE_SPAWN_ATTEMPTS: u32 = 100;
/// Samples per food item before giving up on placing it
pub const FOOD_PLACEMENT_SAMPLES: u32 = 1000;

/// What a maintenance pass added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    pub creatures_spawned: usize,
    pub food_spawned: bool,
}

/// Find a map point at least `min_distance` clear of every obstacle.
///
/// Falls back to the sample with the most clearance (or the map center)
/// when no fully safe point turns up.
pub fn safe_spawn_point(obstacles: &[Obstacle], bounds: &MapBounds, rng: &mut impl Rng, min_distance: f32) -> Vec2 {
    for _ in 0..SAFE_SPAWN_SAMPLES {
        let point = bounds.random_point(rng);
        let blocked = obstacles
            .iter()
            .any(|o| o.overlaps_circle_with_margin(point, min_distance, min_distance));
        if !blocked {
            return point;
        }
    }

    log::debug!("No safe spawn point after {SAFE_SPAWN_SAMPLES} samples, using least crowded");
    let mut best = bounds.center();
    let mut best_clearance = 0.0;
    for _ in 0..FALLBACK_SAMPLES {
        let point = bounds.random_point(rng);
        let clearance = obstacles
            .iter()
            .map(|o| o.clearance(point))
            .fold(f32::INFINITY, f32::min);
        if clearance > best_clearance {
            best_clearance = clearance;
            best = point;
        }
    }
    best
}

/// `safe_spawn_point` against the world's own obstacles
pub fn find_safe_spawn_position(world: &mut World, min_distance: f32) -> Vec2 {
    safe_spawn_point(&world.obstacles, &world.bounds, &mut world.rng, min_distance)
}

/// Random bright-ish creature color
pub fn random_color(rng: &mut impl Rng) -> [u8; 3] {
    [
        rng.random_range(50..=255),
        rng.random_range(50..=255),
        rng.random_range(50..=255),
    ]
}

/// Spawn up to `count` level-1 creatures away from obstacles and the player.
///
/// Returns how many were actually spawned.
pub fn spawn_creatures(world: &mut World, count: usize) -> usize {
    let min_obstacle = world.config.spawn_min_obstacle_distance;
    let min_player = world.config.spawn_min_player_distance;
    let radius = world.config.base_radius + 1.0;

    let mut spawned = 0;
    let mut attempts = 0;
    while spawned < count && attempts < CREATURE_SPAWN_ATTEMPTS {
        attempts += 1;
        let point = find_safe_spawn_position(world, min_obstacle);
        if point.distance(world.player.pos) < min_player {
            continue;
        }
        let color = random_color(&mut world.rng);
        let pos = world.bounds.clamp(point, radius);
        world.add_creature(pos, 1, color);
        spawned += 1;
    }

    if spawned < count {
        log::debug!("Spawned {spawned}/{count} creatures in {attempts} attempts");
    }
    spawned
}

/// Random food nutrition: 70% small (5-10), 20% medium (11-15), 10% large (16-20)
pub fn roll_food_nutrition(rng: &mut impl Rng) -> u32 {
    let roll: f64 = rng.random();
    if roll < 0.7 {
        rng.random_range(5..=10)
    } else if roll < 0.9 {
        rng.random_range(11..=15)
    } else {
        rng.random_range(16..=20)
    }
}

/// Random map point whose food-sized circle clears every obstacle
pub(crate) fn food_point(obstacles: &[Obstacle], bounds: &MapBounds, rng: &mut impl Rng) -> Option<Vec2> {
    (0..FOOD_PLACEMENT_SAMPLES)
        .map(|_| bounds.random_point(rng))
        .find(|&point| !obstacles.iter().any(|o| o.overlaps_circle(point, FOOD_PLACEMENT_RADIUS)))
}

/// Maybe drop one food item (probability `food_spawn_chance`)
pub fn spawn_food(world: &mut World) -> Option<u32> {
    if !world.rng.random_bool(world.config.food_spawn_chance) {
        return None;
    }
    let Some(point) = food_point(&world.obstacles, &world.bounds, &mut world.rng) else {
        log::warn!("No obstacle-free point found for food");
        return None;
    };
    let nutrition = roll_food_nutrition(&mut world.rng);
    Some(world.add_food(point, nutrition))
}

/// Top creatures up to the configured minimum and maybe spawn food
pub fn maintain_population(world: &mut World) -> PopulationReport {
    let missing = world.config.min_creatures.saturating_sub(world.creatures.len());
    let creatures_spawned = if missing > 0 {
        spawn_creatures(world, missing)
    } else {
        0
    };
    let food_spawned = spawn_food(world).is_some();
    PopulationReport {
        creatures_spawned,
        food_spawned,
    }
}
