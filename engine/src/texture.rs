//! Surface textures — sampled by `(u, v) ∈ [0, 1]²` to produce a [`Color`].

use std::sync::Arc;

use crate::color::{self, Color};
use crate::error::{EngineError, EngineResult};

/// How an [`Texture::Image`] samples between backing pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    NearestNeighbor,
    Bilinear,
}

/// A surface texture. Closed set of variants dispatched inline rather than through a trait
/// object, matching the rest of the engine's polymorphism style (see [`crate::material`],
/// [`crate::object`]).
#[derive(Debug, Clone)]
pub enum Texture {
    /// A constant color, independent of `(u, v)`.
    Solid(Color),
    /// A tiled two-color checkerboard. Tile `(⌊u·n⌋ ⊕ ⌊v·n⌋) & 1` selects between `c1`/`c2`.
    Checkerboard {
        c1: Color,
        c2: Color,
        rows_cols: f64,
    },
    /// An RGBA8 pixel buffer sampled by `(u, v)`, with `v = 0` at the bottom of the image (so
    /// row 0 of `pixels` — the top of the source image — maps to `v = 1`). `pixels` is
    /// `Arc`-shared so the same decoded image can back many materials/objects without a deep
    /// copy every time the texture is cloned into another one.
    Image {
        width: usize,
        height: usize,
        pixels: Arc<[u32]>,
        interpolation: Interpolation,
        multiplier: f64,
    },
}

impl Texture {
    /// Constructs an `Image` texture from decoded RGBA8 pixels. The decoder owns byte-level
    /// format handling; this just validates dimensions against the buffer length.
    pub fn image(
        width: usize,
        height: usize,
        pixels: Vec<u32>,
        interpolation: Interpolation,
        multiplier: f64,
    ) -> EngineResult<Self> {
        if width == 0 || height == 0 {
            return Err(EngineError::invalid_argument(
                "image texture created with a zero dimension",
            ));
        }
        if pixels.len() != width * height {
            return Err(EngineError::invalid_argument(format!(
                "image texture pixel buffer has {} entries, expected {}",
                pixels.len(),
                width * height
            )));
        }
        Ok(Self::Image {
            width,
            height,
            pixels: pixels.into(),
            interpolation,
            multiplier,
        })
    }

    /// Samples the texture at normalized surface coordinates `(u, v) ∈ [0, 1]²`.
    pub fn sample(&self, u: f64, v: f64) -> Color {
        match self {
            Texture::Solid(c) => *c,
            Texture::Checkerboard { c1, c2, rows_cols } => {
                let tx = (u * rows_cols).floor() as i64;
                let ty = (v * rows_cols).floor() as i64;
                if (tx ^ ty) & 1 == 0 {
                    *c1
                } else {
                    *c2
                }
            }
            Texture::Image {
                width,
                height,
                pixels,
                interpolation,
                multiplier,
            } => sample_image(*width, *height, pixels, *interpolation, *multiplier, u, v),
        }
    }
}

fn sample_image(
    width: usize,
    height: usize,
    pixels: &[u32],
    interpolation: Interpolation,
    multiplier: f64,
    u: f64,
    v: f64,
) -> Color {
    let at = |x: usize, y: usize| color::from_rgba(pixels[y * width + x]);

    let color = match interpolation {
        Interpolation::NearestNeighbor => {
            let x = ((width - 1) as f64 * u) as usize;
            let y = ((height - 1) as f64 * (1.0 - v)) as usize;
            at(x.min(width - 1), y.min(height - 1))
        }
        Interpolation::Bilinear => {
            let x = (width - 1) as f64 * u;
            let y = (height - 1) as f64 * (1.0 - v);

            let p = x.floor() as i64;
            let q = y.floor() as i64;
            let dp = x - p as f64;
            let dq = y - q as f64;

            let wrap = |i: i64, n: usize| i.rem_euclid(n as i64) as usize;
            let (p0, q0) = (wrap(p, width), wrap(q, height));
            let (p1, q1) = (wrap(p + 1, width), wrap(q + 1, height));

            let c00 = at(p0, q0);
            let c10 = at(p1, q0);
            let c01 = at(p0, q1);
            let c11 = at(p1, q1);

            c00.lerp(c10, dp).lerp(c01.lerp(c11, dp), dq)
        }
    };

    color * multiplier
}
