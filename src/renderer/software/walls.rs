use super::Software;
use crate::math::clamp01;
use crate::renderer::shade;
use crate::world::{Camera, Grid, Side, cast_ray};

/// Faces lit from the darker side.
const SIDE_SHADE: f32 = 0.85;
/// Fog never takes a wall below 15 % brightness.
const FOG_FLOOR: f32 = 0.85;

impl Software {
    /// One DDA ray per column. Assigns the depth buffer.
    pub(super) fn draw_walls(&mut self, grid: &Grid, cam: Camera, max_depth: f32, wall_scale: f32) {
        let (w, h) = (self.width, self.height);
        let half = h as i32 / 2;

        for x in 0..w {
            let offset = cam.column_offset(x, w);
            let hit = cast_ray(grid, cam.pos(), cam.column_angle(x, w), max_depth);

            // fisheye correction
            let corrected = (hit.dist * offset.cos()).max(1e-4);
            self.zbuf[x] = corrected;
            if !hit.hit {
                continue;
            }

            let line_h = (h as f32 / corrected * wall_scale).min((1 << 24) as f32) as i32;
            if line_h <= 0 {
                continue;
            }
            let start = half - line_h / 2;

            let side = if matches!(hit.side, Side::PosX | Side::PosY) {
                SIDE_SHADE
            } else {
                1.0
            };
            let fog = clamp01(corrected / max_depth);
            let k = clamp01(side * (1.0 - fog * FOG_FLOOR));

            let y0 = start.max(0);
            let y1 = (start + line_h).min(h as i32);
            let inv_h = 1.0 / line_h as f32;
            for y in y0..y1 {
                let v = (y - start) as f32 * inv_h;
                let texel = self.texture.sample(hit.u, v);
                self.scratch[y as usize * w + x] = shade(texel, k);
            }
        }
    }
}
