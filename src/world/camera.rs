use glam::{Vec2, vec2};

use crate::math::{lerp, normalize_angle};

/// Player view-point in grid space.
///
/// * Only **yaw** is simulated; there is no pitch and no eye height.
/// * Grid Y grows "down" the map, so increasing yaw turns clockwise on the
///   minimap and to the right on screen.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec2,
    yaw: f32, // radians (0 = +X)
    fov: f32, // horizontal FoV (radians)
}

impl Camera {
    pub fn new(pos: Vec2, yaw: f32, fov: f32) -> Self {
        Self { pos, yaw, fov }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(self) -> Vec2 {
        let (s, c) = self.yaw.sin_cos();
        vec2(c, s)
    }

    /// Unit vector pointing to the camera's right (screen right).
    #[inline(always)]
    pub fn right(self) -> Vec2 {
        self.forward().perp()
    }

    /// Half-width of the view plane at unit distance: `right * tan(fov/2)`.
    #[inline]
    pub fn plane(self) -> Vec2 {
        self.right() * (self.fov * 0.5).tan()
    }

    /*───────────────── projection helpers ─────────────────*/

    /// Angular offset from forward of screen column `x` out of `w`;
    /// column 0 is the left edge at `-fov/2`.
    #[inline]
    pub fn column_offset(self, x: usize, w: usize) -> f32 {
        lerp(-self.fov * 0.5, self.fov * 0.5, x as f32 / w as f32)
    }

    /// Absolute ray angle for screen column `x`, in `[0, 2π)`.
    #[inline]
    pub fn column_angle(self, x: usize, w: usize) -> f32 {
        normalize_angle(self.yaw + self.column_offset(x, w))
    }

    /// Inverse of [`Self::column_offset`]: the (possibly off-screen) column
    /// for an angular offset.
    #[inline]
    pub fn offset_to_column(self, offset: f32, w: usize) -> i32 {
        ((0.5 + offset / self.fov) * w as f32) as i32
    }
}
