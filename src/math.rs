//! Small scalar helpers shared by the world, the simulation and the renderer.
//!
//! Vectors are `glam::Vec2`; everything here works on plain `f32`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(a: f32) -> f32 {
    let r = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if r >= TAU { 0.0 } else { r }
}

/// Wrap an angle into `(-π, π]` (signed offset form).
#[inline]
pub fn wrap_pi(a: f32) -> f32 {
    let r = normalize_angle(a);
    if r > PI { r - TAU } else { r }
}

#[inline]
pub fn clamp01(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Squared distance between two points.
#[inline]
pub fn dist2(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

/// Map a continuous coordinate onto the cell index that contains it.
#[inline]
pub fn cell_of(v: f32) -> i32 {
    v.floor() as i32
}
