//! Rendering abstraction layer.
//!
//! *The simulation never touches a pixel buffer directly.*
//! A type that implements [`Renderer`] reads the [`Sim`] once per frame and
//! hands the finished image to a caller-supplied closure.
//!
//! * Software back-end: [`software::Software`], a per-column ray caster.
//! * Colours are packed **0x00RRGGBB**; [`rgb`] and [`shade`] build them.

use crate::sim::Sim;

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Scale each channel by `k`, clamped to `[0, 1]`.
#[inline]
pub fn shade(c: Rgba, k: f32) -> Rgba {
    let k = k.clamp(0.0, 1.0);
    let ch = |s: u32| (((c >> s) & 0xFF) as f32 * k) as u32;
    (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

/// Fixed palette shared by the sprite and minimap passes.
pub mod palette {
    use super::{Rgba, rgb};

    pub const BLACK: Rgba = rgb(0, 0, 0);
    pub const WHITE: Rgba = rgb(255, 255, 255);
    pub const YELLOW: Rgba = rgb(240, 220, 120);
    pub const GREEN: Rgba = rgb(110, 200, 120);
    pub const RED: Rgba = rgb(230, 60, 60);
    pub const OUTLINE: Rgba = rgb(16, 16, 16);

    pub const FLOOR_A: Rgba = rgb(26, 28, 26);
    pub const FLOOR_B: Rgba = rgb(36, 40, 36);
    pub const CEIL_A: Rgba = rgb(10, 12, 16);
    pub const CEIL_B: Rgba = rgb(14, 16, 20);

    pub const MAP_WALL: Rgba = rgb(120, 120, 120);
    pub const MAP_FLOOR: Rgba = rgb(18, 50, 18);
    pub const MAP_FRAME: Rgba = rgb(40, 44, 52);
    pub const ACCENT: Rgba = rgb(255, 200, 80);
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Draw everything visible from the player's eye.
    fn draw_scene(&mut self, sim: &Sim);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, width: usize, height: usize, sim: &Sim, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(sim);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_channels() {
        assert_eq!(rgb(0x12, 0x34, 0x56), 0x00_12_34_56);
    }

    #[test]
    fn shade_scales_and_clamps() {
        assert_eq!(shade(rgb(200, 100, 50), 0.5), rgb(100, 50, 25));
        assert_eq!(shade(rgb(200, 100, 50), 3.0), rgb(200, 100, 50));
        assert_eq!(shade(rgb(200, 100, 50), -1.0), 0);
    }
}
