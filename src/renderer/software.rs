//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0x00RRGGBB** format.
//! * Per frame: depth reset → floor / ceiling → walls → sprites → minimap.
//! * Walls own the per-column depth buffer; sprites only read it.
//! ---------------------------------------------------------------------------

mod minimap;
mod planes;
mod sprites;
mod walls;

pub use sprites::{SpriteKind, VisSprite};

use crate::{
    renderer::{Renderer, Rgba},
    sim::Sim,
    world::Texture,
};

/// Depth-buffer value before anything is drawn.
pub const FAR: f32 = 1e9;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Wolfenstein-style column renderer.
pub struct Software {
    scratch: Vec<Rgba>,
    /// Corrected wall distance per screen column.
    zbuf: Vec<f32>,
    /// Sprites collected this frame, far to near.
    sprites: Vec<VisSprite>,
    texture: Texture,
    pub show_minimap: bool,
    width: usize,
    height: usize,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(Texture::default())
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
            self.zbuf.resize(w, FAR);
        }

        self.scratch.fill(0);
        self.zbuf.fill(FAR);
        self.sprites.clear();
    }

    fn draw_scene(&mut self, sim: &Sim) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let cfg = sim.config();
        let cam = sim.player().camera(cfg.fov());

        self.draw_planes(sim.grid(), cam, cfg.max_depth);
        self.draw_walls(sim.grid(), cam, cfg.max_depth, cfg.wall_scale);
        self.collect_sprites(sim, cam);
        self.draw_sprites();
        if self.show_minimap {
            self.draw_minimap(sim);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── shared helpers ─────────────────────────────*/
impl Software {
    pub fn new(texture: Texture) -> Self {
        Self {
            scratch: Vec::new(),
            zbuf: Vec::new(),
            sprites: Vec::new(),
            texture,
            show_minimap: false,
            width: 0,
            height: 0,
        }
    }

    /// Per-column depth left by the last frame.
    #[inline]
    pub fn zbuf(&self) -> &[f32] {
        &self.zbuf
    }

    #[inline]
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.width + x]
    }

    /// Axis-aligned box, clipped to the frame.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return;
        }
        for yy in y0..y1 {
            let row = yy as usize * self.width;
            self.scratch[row + x0 as usize..row + x1 as usize].fill(c);
        }
    }

    /// Column `x`, rows `y0..y1` (exclusive), clipped.
    #[inline]
    fn vline(&mut self, x: i32, y0: i32, y1: i32, c: Rgba) {
        self.fill_rect(x, y0, 1, y1 - y0, c);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
