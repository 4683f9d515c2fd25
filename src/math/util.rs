use super::Point2d;
use cgmath::prelude::*;

/// The smoothstep easing curve `3t² - 2t³`, with `t` clamped to `[0, 1]`.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linearly interpolates between two points.
pub fn lerp(from: Point2d, to: Point2d, t: f64) -> Point2d {
    from + t * (to - from)
}

/// The Manhattan (taxicab) distance between two points.
pub fn manhattan(a: Point2d, b: Point2d) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// The polar angle of `point` around `centre`, in radians in `(-π, π]`.
pub fn polar_angle(centre: Point2d, point: Point2d) -> f64 {
    let v = point - centre;
    v.y.atan2(v.x)
}

/// The straight-line distance between two points.
pub fn distance(a: Point2d, b: Point2d) -> f64 {
    a.distance(b)
}
