//! Initial layout generation
//!
//! Scatters obstacles with a minimum gap between them, tops up with large
//! obstacles until a target coverage is reached, then scatters food.

use glam::Vec2;
use rand::Rng;

use super::spawn::{food_point, maintain_population, safe_spawn_point};
use super::state::{Obstacle, ObstacleShape, World};
use crate::config::SimConfig;

/// Minimum spacing between obstacle edges
pub const OBSTACLE_GAP: f32 = 10.0;
/// Fraction of the map area the large-obstacle phase aims to cover
pub const TARGET_COVERAGE: f32 = 0.06;
/// Placement attempts per obstacle, and for the whole large-obstacle phase
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Can `candidate` sit next to every placed obstacle with `OBSTACLE_GAP` to spare?
pub fn placement_clear(candidate: &Obstacle, placed: &[Obstacle]) -> bool {
    placed.iter().all(|other| spaced(candidate, other))
}

fn spaced(a: &Obstacle, b: &Obstacle) -> bool {
    match (a.shape, b.shape) {
        (ObstacleShape::Circle, ObstacleShape::Circle) => {
            a.pos.distance(b.pos) >= a.size + b.size + OBSTACLE_GAP
        }
        (ObstacleShape::Rectangle, ObstacleShape::Rectangle) => {
            let gap_x = (a.pos.x - b.pos.x).abs() - (a.width() + b.width()) / 2.0;
            let gap_y = (a.pos.y - b.pos.y).abs() - (a.height() + b.height()) / 2.0;
            gap_x >= OBSTACLE_GAP || gap_y >= OBSTACLE_GAP
        }
        (ObstacleShape::Circle, ObstacleShape::Rectangle) => circle_rect_spaced(a, b),
        (ObstacleShape::Rectangle, ObstacleShape::Circle) => circle_rect_spaced(b, a),
    }
}

/// Exact closest-point test between a circle obstacle and a rectangle obstacle
fn circle_rect_spaced(circle: &Obstacle, rect: &Obstacle) -> bool {
    let half = Vec2::new(rect.width() / 2.0, rect.height() / 2.0);
    let closest = circle.pos.clamp(rect.pos - half, rect.pos + half);
    circle.pos.distance(closest) >= circle.size + OBSTACLE_GAP
}

/// Random obstacle with a size in `sizes`, fully inside the map.
///
/// `None` when the map is too small for the rolled size.
fn roll_obstacle(world: &mut World, sizes: std::ops::RangeInclusive<u32>) -> Option<Obstacle> {
    let size = world.rng.random_range(sizes);
    let shape = if world.rng.random_bool(0.5) {
        ObstacleShape::Circle
    } else {
        ObstacleShape::Rectangle
    };
    let width = world.bounds.width as u32;
    let height = world.bounds.height as u32;
    if width < size * 2 || height < size * 2 {
        return None;
    }
    let x = world.rng.random_range(size..=width - size);
    let y = world.rng.random_range(size..=height - size);
    Some(Obstacle::new(Vec2::new(x as f32, y as f32), size as f32, shape))
}

/// Place `count` regular obstacles, then large ones up to the coverage target.
///
/// Returns the number of obstacles added.
pub fn generate_obstacles(world: &mut World, count: usize) -> usize {
    let map_area = world.bounds.width * world.bounds.height;
    let mut coverage: f32 = world.obstacles.iter().map(Obstacle::area).sum();
    let before = world.obstacles.len();

    for _ in 0..count {
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let Some(candidate) = roll_obstacle(world, 20..=100) else {
                continue;
            };
            if placement_clear(&candidate, &world.obstacles) {
                coverage += candidate.area();
                world.obstacles.push(candidate);
                break;
            }
        }
    }

    let mut attempts = 0;
    while coverage / map_area < TARGET_COVERAGE && attempts < MAX_PLACEMENT_ATTEMPTS {
        attempts += 1;
        let Some(candidate) = roll_obstacle(world, 150..=200) else {
            continue;
        };
        if placement_clear(&candidate, &world.obstacles) {
            coverage += candidate.area();
            world.obstacles.push(candidate);
        }
    }

    let added = world.obstacles.len() - before;
    log::debug!(
        "Placed {added} obstacles, coverage {:.1}%",
        coverage / map_area * 100.0
    );
    added
}

/// Scatter `count` food items: 70% nutrition 5-10, 30% 11-20
pub fn generate_foods(world: &mut World, count: usize) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        let Some(point) = food_point(&world.obstacles, &world.bounds, &mut world.rng) else {
            log::warn!("Map too crowded, placed {placed}/{count} foods");
            break;
        };
        let nutrition = if world.rng.random_bool(0.7) {
            world.rng.random_range(5..=10)
        } else {
            world.rng.random_range(11..=20)
        };
        world.add_food(point, nutrition);
        placed += 1;
    }
    placed
}

impl World {
    /// Build a fresh start state: obstacles, player, food and creatures
    pub fn generate(config: SimConfig, seed: u64) -> World {
        let mut world = World::new(config, seed);
        let obstacles = world.config.initial_obstacles;
        let foods = world.config.initial_foods;

        generate_obstacles(&mut world, obstacles);

        let min_distance = world.config.spawn_min_obstacle_distance;
        let spawn = safe_spawn_point(&world.obstacles, &world.bounds, &mut world.rng, min_distance);
        world.player.pos = world.bounds.clamp(spawn, world.player.stats.radius);

        generate_foods(&mut world, foods);
        maintain_population(&mut world);

        log::info!(
            "Generated world (seed {seed}): {} obstacles, {} foods, {} creatures",
            world.obstacles.len(),
            world.foods.len(),
            world.creatures.len()
        );
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        SimConfig {
            map_width: 3000.0,
            map_height: 2000.0,
            initial_obstacles: 15,
            initial_foods: 60,
            min_creatures: 10,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_circle_spacing() {
        let a = Obstacle::circle(Vec2::new(0.0, 0.0), 50.0);
        assert!(!placement_clear(&Obstacle::circle(Vec2::new(109.0, 0.0), 50.0), &[a.clone()]));
        assert!(placement_clear(&Obstacle::circle(Vec2::new(110.0, 0.0), 50.0), &[a]));
    }

    #[test]
    fn test_rect_spacing_needs_one_clear_axis() {
        // 100 x 75 rectangles
        let a = Obstacle::rectangle(Vec2::new(0.0, 0.0), 50.0);
        // x gap 5, y overlapping
        assert!(!placement_clear(&Obstacle::rectangle(Vec2::new(105.0, 0.0), 50.0), &[a.clone()]));
        // x gap 10
        assert!(placement_clear(&Obstacle::rectangle(Vec2::new(110.0, 0.0), 50.0), &[a.clone()]));
        // Diagonal: both gaps 5
        assert!(!placement_clear(&Obstacle::rectangle(Vec2::new(105.0, 80.0), 50.0), &[a]));
    }

    #[test]
    fn test_mixed_spacing_uses_closest_point() {
        // Rectangle x in [-100, 100], y in [-75, 75]
        let rect = Obstacle::rectangle(Vec2::ZERO, 100.0);
        // Corner distance: (130-100, 105-75) = (30, 30) -> 42.4
        let near_corner = Obstacle::circle(Vec2::new(130.0, 105.0), 30.0);
        assert!(placement_clear(&near_corner, &[rect.clone()]));
        let too_close = Obstacle::circle(Vec2::new(130.0, 105.0), 35.0);
        assert!(!placement_clear(&too_close, &[rect.clone()]));
        // Order does not matter
        assert!(!placement_clear(&rect, &[too_close]));
    }

    #[test]
    fn test_generated_obstacles_respect_gap_and_bounds() {
        let mut world = World::new(small_config(), 404);
        generate_obstacles(&mut world, 15);
        assert!(!world.obstacles.is_empty());
        for (i, o) in world.obstacles.iter().enumerate() {
            assert!(o.pos.x >= o.size && o.pos.x <= world.bounds.width - o.size);
            assert!(o.pos.y >= o.size && o.pos.y <= world.bounds.height - o.size);
            assert!(placement_clear(o, &world.obstacles[..i]));
        }
    }

    #[test]
    fn test_coverage_target_reached() {
        let mut world = World::new(small_config(), 5);
        generate_obstacles(&mut world, 0);
        let covered: f32 = world.obstacles.iter().map(Obstacle::area).sum();
        assert!(covered / (3000.0 * 2000.0) >= TARGET_COVERAGE);
        assert!(world.obstacles.iter().all(|o| o.size >= 150.0));
    }

    #[test]
    fn test_tiny_map_places_nothing() {
        let config = SimConfig {
            map_width: 30.0,
            map_height: 30.0,
            ..SimConfig::default()
        };
        let mut world = World::new(config, 1);
        assert_eq!(generate_obstacles(&mut world, 5), 0);
    }

    #[test]
    fn test_foods_avoid_obstacles() {
        let mut world = World::new(small_config(), 12);
        generate_obstacles(&mut world, 15);
        assert_eq!(generate_foods(&mut world, 60), 60);
        for f in &world.foods {
            assert!((5..=20).contains(&f.nutrition));
            assert!(world.obstacles.iter().all(|o| !o.overlaps_circle(f.pos, 15.0)));
        }
    }

    #[test]
    fn test_generate_full_world() {
        let world = World::generate(small_config(), 2024);
        assert!(!world.obstacles.is_empty());
        // Population maintenance may have dropped one more
        assert!((60..=61).contains(&world.foods.len()));
        assert_eq!(world.creatures.len(), 10);
        assert!(world.bounds.contains(world.player.pos, world.player.stats.radius));
        assert_eq!(world.time_ticks, 0);

        let again = World::generate(small_config(), 2024);
        assert_eq!(again.player.pos, world.player.pos);
        assert_eq!(again.obstacles.len(), world.obstacles.len());
    }
}
