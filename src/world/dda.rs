//! Grid DDA traversal.
//!
//! One walker steps a ray through successive grid-line crossings. The wall
//! caster and the line-of-sight test are both thin loops around it.

use glam::{IVec2, Vec2};

use super::Grid;
use crate::math::cell_of;

/// Hard bound on cells visited by one traversal.
pub const MAX_STEPS: usize = 4096;

/// Stand-in for `1/0` on axis-aligned rays.
const FAR: f32 = 1e30;

/// Which grid line a step crossed, named by the direction of travel.
///
/// `PosX`/`NegX` cross a vertical line (the hit face is perpendicular to X),
/// `PosY`/`NegY` a horizontal one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    PosX,
    NegX,
    PosY,
    NegY,
}

impl Side {
    #[inline]
    pub fn is_x(self) -> bool {
        matches!(self, Side::PosX | Side::NegX)
    }
}

/// Incremental DDA state.
#[derive(Clone, Copy, Debug)]
pub struct Dda {
    cell: IVec2,
    step: IVec2,
    side_dist: Vec2,
    delta: Vec2,
}

impl Dda {
    /// Start at the cell containing `origin`, heading along `dir`
    /// (need not be normalised; distances are in units of `|dir|`).
    pub fn new(origin: Vec2, dir: Vec2) -> Self {
        let inv = |d: f32| {
            let v = (1.0 / d).abs();
            if v.is_finite() { v } else { FAR }
        };
        let delta = Vec2::new(inv(dir.x), inv(dir.y));
        let cell = IVec2::new(cell_of(origin.x), cell_of(origin.y));

        let (step_x, side_x) = if dir.x < 0.0 {
            (-1, (origin.x - cell.x as f32) * delta.x)
        } else {
            (1, (cell.x as f32 + 1.0 - origin.x) * delta.x)
        };
        let (step_y, side_y) = if dir.y < 0.0 {
            (-1, (origin.y - cell.y as f32) * delta.y)
        } else {
            (1, (cell.y as f32 + 1.0 - origin.y) * delta.y)
        };

        Self {
            cell,
            step: IVec2::new(step_x, step_y),
            side_dist: Vec2::new(side_x, side_y),
            delta,
        }
    }

    #[inline]
    pub fn cell(&self) -> IVec2 {
        self.cell
    }

    /// Advance into the next cell; returns the line that was crossed.
    #[inline]
    pub fn advance(&mut self) -> Side {
        if self.side_dist.x < self.side_dist.y {
            self.side_dist.x += self.delta.x;
            self.cell.x += self.step.x;
            if self.step.x > 0 { Side::PosX } else { Side::NegX }
        } else {
            self.side_dist.y += self.delta.y;
            self.cell.y += self.step.y;
            if self.step.y > 0 { Side::PosY } else { Side::NegY }
        }
    }

    /// Ray length from the origin to the line crossed by the last `advance`.
    #[inline]
    pub fn last_crossing(&self, side: Side) -> f32 {
        if side.is_x() {
            self.side_dist.x - self.delta.x
        } else {
            self.side_dist.y - self.delta.y
        }
    }
}

/// Result of one wall ray.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Euclidean ray length (not fisheye corrected), `[1e-4, max_depth]`.
    pub dist: f32,
    pub side: Side,
    pub cell: IVec2,
    /// World-space hit point.
    pub point: Vec2,
    /// Texture coordinate along the face in `[0, 1)`.
    pub u: f32,
    /// False when the step bound ran out before any solid cell.
    pub hit: bool,
}

/// Cast one ray from `origin` at `angle` until the first solid cell.
///
/// The boundary counts as solid, so rays leaving the grid hit the border.
pub fn cast_ray(grid: &Grid, origin: Vec2, angle: f32, max_depth: f32) -> RayHit {
    let (sin, cos) = angle.sin_cos();
    let dir = Vec2::new(cos, sin);
    let mut dda = Dda::new(origin, dir);

    for _ in 0..MAX_STEPS {
        let side = dda.advance();
        let cell = dda.cell();
        if !grid.is_solid(cell.x, cell.y) {
            continue;
        }

        let dist = dda.last_crossing(side).clamp(1e-4, max_depth);
        let point = origin + dir * dist;
        let u = if side.is_x() {
            let f = point.y - point.y.floor();
            if dir.x > 0.0 { 1.0 - f } else { f }
        } else {
            let f = point.x - point.x.floor();
            if dir.y < 0.0 { 1.0 - f } else { f }
        };
        return RayHit {
            dist,
            side,
            cell,
            point,
            u: u.clamp(0.0, 0.9999),
            hit: true,
        };
    }

    RayHit {
        dist: max_depth,
        side: Side::PosX,
        cell: dda.cell(),
        point: origin + dir * max_depth,
        u: 0.0,
        hit: false,
    }
}

/// Cell-level line of sight: true iff the walk from `a` reaches the cell
/// containing `b` before entering any solid cell.
///
/// This is a cell test, not a continuous one; rays grazing a wall corner may
/// report either answer.
pub fn line_of_sight(grid: &Grid, a: Vec2, b: Vec2) -> bool {
    let d = b - a;
    if d.length_squared() < 1e-12 {
        return true;
    }
    let end = IVec2::new(cell_of(b.x), cell_of(b.y));
    let mut dda = Dda::new(a, d.normalize());

    for _ in 0..MAX_STEPS {
        if dda.cell() == end {
            return true;
        }
        dda.advance();
        let c = dda.cell();
        if grid.is_solid(c.x, c.y) {
            return false;
        }
    }
    false
}
