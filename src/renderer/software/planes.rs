//! Floor / ceiling casting.
//!
//! Each screen row above or below the horizon maps to one distance on the
//! floor plane; the world point under the left screen edge is then stepped
//! linearly across the row.

use super::Software;
use crate::math::{cell_of, clamp01};
use crate::renderer::{Rgba, palette, shade};
use crate::world::{Camera, Grid};

/// Fog keeps floors at 30 % brightness or more.
const FOG_FLOOR: f32 = 0.7;

impl Software {
    /// Checkerboard floor and ceiling. Unreachable or out-of-grid cells are
    /// black. Floor rows pull the depth buffer nearer; ceiling rows do not.
    pub(super) fn draw_planes(&mut self, grid: &Grid, cam: Camera, max_depth: f32) {
        let (w, h) = (self.width, self.height);
        let half = h as f32 * 0.5;
        let eye = cam.pos();

        let dir = cam.forward();
        let plane = cam.plane();
        let ray_l = dir - plane;
        let ray_r = dir + plane;

        for sy in 0..h {
            let row = sy as f32 - half;
            if row == 0.0 {
                continue;
            }
            let is_floor = row > 0.0;
            let row_dist = half / row.abs();
            let step = (ray_r - ray_l) * row_dist / w as f32;
            let mut p = eye + ray_l * row_dist;

            for sx in 0..w {
                let (cx, cy) = (cell_of(p.x), cell_of(p.y));
                let px = if grid.is_reachable(cx, cy) {
                    // the whole row sits at one view depth, the same metric walls store
                    if is_floor && row_dist < self.zbuf[sx] {
                        self.zbuf[sx] = row_dist;
                    }
                    let k = 1.0 - clamp01(p.distance(eye) / max_depth) * FOG_FLOOR;
                    shade(checker(cx, cy, is_floor), k)
                } else {
                    palette::BLACK
                };
                self.scratch[sy * w + sx] = px;
                p += step;
            }
        }
    }
}

#[inline]
fn checker(cx: i32, cy: i32, floor: bool) -> Rgba {
    let even = (cx + cy) & 1 == 0;
    match (floor, even) {
        (true, true) => palette::FLOOR_A,
        (true, false) => palette::FLOOR_B,
        (false, true) => palette::CEIL_A,
        (false, false) => palette::CEIL_B,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Renderer;
    use crate::renderer::software::FAR;
    use crate::world::Cell;
    use glam::Vec2;
    use std::f32::consts::FRAC_PI_2;

    fn reachable_open(w: i32, h: i32, from: Vec2) -> Grid {
        let mut g = Grid::open(w, h);
        g.compute_reachable(cell_of(from.x), cell_of(from.y));
        g
    }

    #[test]
    fn checker_alternates() {
        assert_ne!(checker(0, 0, true), checker(1, 0, true));
        assert_eq!(checker(0, 0, true), checker(1, 1, true));
        assert_ne!(checker(0, 0, true), checker(0, 0, false));
    }

    #[test]
    fn floor_rows_write_depth_ceiling_rows_do_not() {
        let eye = Vec2::new(20.5, 20.5);
        let g = reachable_open(64, 64, eye);
        let mut sw = Software::default();
        sw.begin_frame(32, 20);
        sw.draw_planes(&g, Camera::new(eye, 0.0, FRAC_PI_2), 32.0);
        // bottom row is one half-height away: depth 10 / 9
        assert!(sw.zbuf().iter().all(|d| (*d - 10.0 / 9.0).abs() < 1e-5));
        assert_ne!(sw.pixel(16, 0), 0);
        assert_ne!(sw.pixel(16, 19), 0);
    }

    #[test]
    fn unreachable_cells_are_black() {
        let eye = Vec2::new(1.5, 2.5);
        let mut g = Grid::open(64, 64);
        // wall off everything beyond x = 3
        for y in 0..64 {
            g.set(3, y, Cell::Wall);
        }
        g.compute_reachable(1, 2);

        let mut sw = Software::default();
        sw.begin_frame(32, 40);
        sw.draw_planes(&g, Camera::new(eye, 0.0, FRAC_PI_2), 32.0);
        // row 21 is one row below the horizon: the floor point is 20 cells ahead
        assert_eq!(sw.pixel(16, 21), palette::BLACK);
        // bottom row lands ~1 cell ahead, inside the pocket
        assert_ne!(sw.pixel(16, 39), palette::BLACK);
    }

    #[test]
    fn floor_depth_is_flat_across_a_row() {
        let eye = Vec2::new(20.5, 20.5);
        let g = reachable_open(64, 64, eye);
        let mut sw = Software::default();
        sw.begin_frame(32, 20);
        sw.draw_planes(&g, Camera::new(eye, 0.3, FRAC_PI_2), 32.0);
        let z = sw.zbuf();
        assert!(z.iter().all(|d| (*d - z[16]).abs() < 1e-5));
        assert!(z[0] < FAR);
    }
}
