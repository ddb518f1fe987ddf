//! Sliding resolver
//!
//! A blocked move keeps as much motion as possible along the surface of the
//! first obstacle it runs into:
//! - circles: the move is projected onto the tangent at the entity's current
//!   position and shortened to `SLIDE_FACTOR` of the attempted travel
//! - rectangles: east/west faces clamp x just outside the face (smooth
//!   horizontal slide), north/south faces freeze y (hard vertical stop)

use glam::Vec2;

use super::collision::spans_overlap;
use super::state::{Obstacle, ObstacleShape};
use crate::consts::SLIDE_FACTOR;

/// Resolve a proposed move against the obstacle set.
///
/// Only the first obstacle (in iteration order) overlapping `proposed`
/// shapes the slide. A slide that would end inside any other obstacle the
/// entity was not already touching is rejected and `current` is returned.
pub fn resolve_slide(current: Vec2, proposed: Vec2, radius: f32, obstacles: &[Obstacle]) -> Vec2 {
    let Some((blocker_idx, blocker)) = obstacles
        .iter()
        .enumerate()
        .find(|(_, o)| o.overlaps_circle(proposed, radius))
    else {
        return proposed;
    };

    let slid = match blocker.shape {
        ObstacleShape::Circle => slide_around_circle(current, proposed, radius, blocker),
        ObstacleShape::Rectangle => slide_along_rect(current, proposed, radius, blocker),
    };

    let enters_other = obstacles.iter().enumerate().any(|(i, o)| {
        i != blocker_idx && o.overlaps_circle(slid, radius) && !o.overlaps_circle(current, radius)
    });
    if enters_other {
        return current;
    }

    slid
}

/// Unit tangent to the obstacle surface in the direction of the attempted move.
///
/// Zero when the entity sits on the obstacle center or moves straight at it.
pub fn slide_tangent(current: Vec2, proposed: Vec2, obstacle_center: Vec2) -> Vec2 {
    let normal = (current - obstacle_center).normalize_or_zero();
    if normal == Vec2::ZERO {
        return Vec2::ZERO;
    }
    let movement = proposed - current;
    let tangent = movement - normal * movement.dot(normal);
    tangent.normalize_or_zero()
}

fn slide_around_circle(current: Vec2, proposed: Vec2, radius: f32, obstacle: &Obstacle) -> Vec2 {
    let tangent = slide_tangent(current, proposed, obstacle.pos);
    let travel = current.distance(proposed);
    let slid = current + tangent * (travel * SLIDE_FACTOR);

    // Never risk going deeper
    if obstacle.overlaps_circle(slid, radius) {
        return current;
    }
    slid
}

fn slide_along_rect(current: Vec2, proposed: Vec2, radius: f32, obstacle: &Obstacle) -> Vec2 {
    let half = Vec2::new(obstacle.width() / 2.0, obstacle.height() / 2.0);
    let min = obstacle.pos - half;
    let max = obstacle.pos + half;

    let mut result = proposed;
    let rows_overlap = spans_overlap(proposed.y, radius, min.y, max.y);

    // East/west faces: park just outside the face we approached from
    if rows_overlap {
        if current.x < min.x {
            result.x = min.x - radius;
        } else if current.x > max.x {
            result.x = max.x + radius;
        }
    }

    // North/south faces: no vertical sliding
    if spans_overlap(result.x, radius, min.x, max.x) && rows_overlap {
        result.y = current.y;
    }

    result
}
