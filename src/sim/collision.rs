//! Overlap predicates for circles and axis-aligned rectangles
//!
//! Circle-vs-rectangle uses one AABB approximation everywhere: the circle's
//! bounding box is tested against the rectangle. Corners therefore register
//! contact slightly early, which matches how the sliding resolver clamps
//! against rectangle edges.

use glam::Vec2;

/// True iff the two circles overlap (touching is not overlapping)
#[inline]
pub fn circles_overlap(p1: Vec2, r1: f32, p2: Vec2, r2: f32) -> bool {
    p1.distance(p2) < r1 + r2
}

/// True iff a circle's bounding box overlaps a rectangle centered at `rect_center`
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_center: Vec2, width: f32, height: f32) -> bool {
    let half = Vec2::new(width / 2.0, height / 2.0);
    let min = rect_center - half;
    let max = rect_center + half;
    center.x + radius > min.x
        && center.x - radius < max.x
        && center.y + radius > min.y
        && center.y - radius < max.y
}

/// One-axis extent `center ± radius` intersects the open interval `(lo, hi)`
#[inline]
pub(crate) fn spans_overlap(center: f32, radius: f32, lo: f32, hi: f32) -> bool {
    center + radius > lo && center - radius < hi
}
