//! Entity movement
//!
//! Player and creatures share one path: direction * speed, then the sliding
//! resolver, then a clamp to the map bounds.

use glam::Vec2;

use super::ai;
use super::slide::resolve_slide;
use super::state::{Body, MapBounds, Obstacle, World};
use crate::heading_to_vec;

/// Move a body one step along `direction` (unit or zero)
pub fn step_body<B: Body>(body: &mut B, direction: Vec2, speed: f32, obstacles: &[Obstacle], bounds: &MapBounds) {
    let current = body.pos();
    let radius = body.radius();
    let proposed = current + direction * speed;
    let slid = resolve_slide(current, proposed, radius, obstacles);
    body.set_pos(bounds.clamp(slid, radius));
}

/// Direction implied by a pointer offset from screen center, zero inside the dead zone
pub fn pointer_direction(pointer: Vec2, dead_zone: f32) -> Vec2 {
    if pointer.length() <= dead_zone {
        return Vec2::ZERO;
    }
    pointer.normalize_or_zero()
}

/// Move the player toward the pointer
pub fn move_player(world: &mut World, pointer: Vec2) {
    let direction = pointer_direction(pointer, world.config.player_dead_zone);
    let speed = world.config.player_speed;
    step_body(&mut world.player, direction, speed, &world.obstacles, &world.bounds);
}

/// Decide and move every creature in collection order.
///
/// Later creatures see the already-updated positions of earlier ones.
pub fn move_creatures(world: &mut World) {
    let speed = world.config.creature_speed;
    let interval = world.config.wander_interval_ticks;

    for i in 0..world.creatures.len() {
        let decision = ai::decide(
            &world.creatures[i],
            &world.player,
            &world.creatures,
            &world.foods,
            &world.config,
        );

        let creature = &mut world.creatures[i];
        ai::advance_wander(&mut creature.ai, interval, &mut world.rng);
        creature.ai.target = decision.target();

        let direction = decision
            .direction()
            .unwrap_or_else(|| heading_to_vec(creature.ai.heading));
        step_body(creature, direction, speed, &world.obstacles, &world.bounds);
    }
}
