// Wall texture storage. The renderer samples it through `Texture::sample`
// only; where the pixels come from (procedural generator, image file) is the
// caller's business.

/// CPU-side storage: 32-bit **0x00RRGGBB** in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// Things that can go wrong when wrapping a caller-supplied buffer.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Width or height is zero.
    #[error("texture `{0}` has zero size")]
    Empty(String),

    /// Pixel count does not match `w * h`.
    #[error("texture `{name}`: expected {expected} pixels, got {got}")]
    SizeMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
}

/// Dark stone bricks, 64×64: staggered courses, mortar lines, and a cheap
/// per-brick tone so the wall does not look like a flat tile.
impl Default for Texture {
    fn default() -> Self {
        const N: usize = 64;
        const BRICK_W: usize = 16;
        const BRICK_H: usize = 8;
        const MORTAR: u32 = 0x00_12_12_16;

        let mut pixels = vec![0u32; N * N];
        for y in 0..N {
            let course = y / BRICK_H;
            let offset = if course & 1 == 0 { 0 } else { BRICK_W / 2 };
            for x in 0..N {
                let bx = (x + offset) / BRICK_W;
                let mortar = y % BRICK_H == 0 || (x + offset) % BRICK_W == 0;
                pixels[y * N + x] = if mortar {
                    MORTAR
                } else {
                    // hash the brick index into a small brightness wobble
                    let tone = ((bx * 7 + course * 13) % 5) as u32 * 4;
                    let grain = ((x * 31 + y * 17) % 3) as u32 * 2;
                    let v = 0x2A + tone + grain;
                    (v << 16) | (v << 8) | (v + 6)
                };
            }
        }
        Texture {
            name: "BRICKS".to_string(),
            w: N,
            h: N,
            pixels,
        }
    }
}

impl Texture {
    /// Wrap an externally produced pixel buffer.
    pub fn from_pixels<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<u32>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if w == 0 || h == 0 {
            return Err(TextureError::Empty(name));
        }
        if pixels.len() != w * h {
            return Err(TextureError::SizeMismatch {
                name,
                expected: w * h,
                got: pixels.len(),
            });
        }
        Ok(Self { name, w, h, pixels })
    }

    /// Nearest texel for `u, v` in `[0, 1)`; out-of-range values clamp.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let tx = ((u * self.w as f32) as usize).min(self.w - 1);
        let ty = ((v * self.h as f32) as usize).min(self.h - 1);
        self.pixels[ty * self.w + tx]
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
