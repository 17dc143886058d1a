//! Grid collision for everything that moves.
//!
//! ✔ player: axis-separated point test, so diagonal pushes slide along walls
//! ✔ enemies: swept sub-steps against a sampled circle
//! ✔ projectiles: same sub-step count rule, driven from `projectiles.rs`

use glam::Vec2;

use crate::math::cell_of;
use crate::world::Grid;

/// Largest per-substep displacement for enemies.
pub const ENEMY_STEP: f32 = 0.08;
/// Largest per-substep displacement for projectiles.
pub const PROJECTILE_STEP: f32 = 0.05;

/// Sub-step count for `delta`: `ceil(max(|dx|, |dy|) / step)`, at least 1.
#[inline]
pub fn substeps(delta: Vec2, step: f32) -> usize {
    let n = (delta.x.abs().max(delta.y.abs()) / step).ceil();
    if n.is_finite() && n >= 1.0 {
        n as usize
    } else {
        1
    }
}

/* ─────────────────────────  PLAYER  ───────────────────────────── */

/// Try X against the current Y, then Y against the (maybe updated) X.
/// Each axis commits only if its target cell is open.
pub fn slide_move(grid: &Grid, pos: Vec2, delta: Vec2) -> Vec2 {
    let mut p = pos;
    let nx = p.x + delta.x;
    if !grid.is_solid(cell_of(nx), cell_of(p.y)) {
        p.x = nx;
    }
    let ny = p.y + delta.y;
    if !grid.is_solid(cell_of(p.x), cell_of(ny)) {
        p.y = ny;
    }
    p
}

/* ─────────────────────────  CIRCLES  ──────────────────────────── */

/// Circle-vs-grid, approximated by the centre plus the four cardinal
/// points at distance `r`. Diagonal corners can clip slightly.
pub fn circle_hits_solid(grid: &Grid, c: Vec2, r: f32) -> bool {
    [
        Vec2::new(c.x - r, c.y),
        Vec2::new(c.x + r, c.y),
        Vec2::new(c.x, c.y - r),
        Vec2::new(c.x, c.y + r),
        c,
    ]
    .into_iter()
    .any(|p| grid.is_solid_at(p))
}

/// Move a circle by `delta` in sub-steps of at most [`ENEMY_STEP`],
/// resolving each axis separately per sub-step.
pub fn sweep_circle(grid: &Grid, pos: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let n = substeps(delta, ENEMY_STEP);
    let slice = delta / n as f32;
    let mut p = pos;
    for _ in 0..n {
        let nx = p.x + slice.x;
        if !circle_hits_solid(grid, Vec2::new(nx, p.y), radius) {
            p.x = nx;
        }
        let ny = p.y + slice.y;
        if !circle_hits_solid(grid, Vec2::new(p.x, ny), radius) {
            p.y = ny;
        }
    }
    p
}
