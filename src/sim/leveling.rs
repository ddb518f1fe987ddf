//! Leveling curve
//!
//! `N(1) = 20`, `N(L) = floor(N(L-1) * 1.5)`. The edible threshold for a
//! level is `N(L) / 1.5`: the largest food (or prey bonus) it may swallow.
//! Levels are capped at `MAX_LEVEL`, where `N` still fits in a `u32`.

use crate::consts::{BASE_REQUIRED_NUTRITION, MAX_LEVEL, NUTRITION_GROWTH};

/// Nutrition needed to advance past `level`
///
/// Levels below 1 are treated as level 1, levels above `MAX_LEVEL` as `MAX_LEVEL`.
pub fn required_nutrition(level: u32) -> u32 {
    let mut required = BASE_REQUIRED_NUTRITION;
    for _ in 1..level.clamp(1, MAX_LEVEL) {
        // floor(n * 1.5) == n + n / 2 for non-negative integers
        required = required.saturating_add(required / 2);
    }
    required
}

/// Largest nutrition value an entity of `level` may eat
#[inline]
pub fn edible_threshold(level: u32) -> f64 {
    required_nutrition(level) as f64 / NUTRITION_GROWTH
}

/// Whether food worth `nutrition` is edible at `level`
#[inline]
pub fn can_eat(level: u32, nutrition: u32) -> bool {
    nutrition as f64 <= edible_threshold(level)
}

/// Fraction of the current level already filled, clamped to `0.0..=1.0`
pub fn level_progress(level: u32, nutrition: u32) -> f32 {
    (nutrition as f32 / required_nutrition(level) as f32).min(1.0)
}
