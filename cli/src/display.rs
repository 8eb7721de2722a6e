//! Terminal presentation: tone mapping, gamma correction, and the four output encodings.
//!
//! The engine hands back linear-radiance pixels already clamped and packed as RGBA8 — tone
//! mapping and gamma are display concerns, not rendering ones, so they're unpacked, adjusted,
//! and written to the terminal entirely in this module.

use crossterm::style::{self, Stylize};
use photon_engine::color;
use photon_engine::Color;
use std::io::{self, Write};

/// Terminal output encoding. Each trades effective resolution against color fidelity.
#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum OutputMode {
    /// Unicode braille patterns (2×4 dots per cell) with ANSI true-color.
    Braille,
    /// ANSI 24-bit true-color using full-block characters.
    Truecolor,
    /// Half-block rendering with separate fg/bg colors — 2 vertical pixels per cell.
    Halfblock,
    /// ASCII grayscale density ramp.
    Ascii,
}

/// HDR-to-LDR tone mapping operators, applied in linear space before gamma correction.
#[derive(Debug, Clone, Copy, PartialEq, Default, clap::ValueEnum)]
pub enum ToneMapOp {
    /// Clamp to `[0, 1]` directly.
    #[default]
    None,
    /// Reinhard global operator (2002): `L_d = L / (1 + L)`.
    Reinhard,
    /// ACES filmic tone mapping (Narkowicz 2015 approximation).
    Aces,
}

impl ToneMapOp {
    pub fn apply(self, c: Color) -> Color {
        match self {
            ToneMapOp::None => c,
            ToneMapOp::Reinhard => Color::new(
                c.x / (1.0 + c.x),
                c.y / (1.0 + c.y),
                c.z / (1.0 + c.z),
            ),
            ToneMapOp::Aces => {
                fn aces_channel(x: f64) -> f64 {
                    let (a, b, c, d, e) = (2.51, 0.03, 2.43, 0.59, 0.14);
                    ((x * (a * x + b)) / (x * (c * x + d) + e)).clamp(0.0, 1.0)
                }
                Color::new(aces_channel(c.x), aces_channel(c.y), aces_channel(c.z))
            }
        }
    }
}

/// Applies the sRGB gamma curve (γ = 2.2 approximated as sqrt) for perceptually correct
/// display on standard monitors / terminals with true-color support.
fn gamma_correct(c: Color) -> Color {
    Color::new(c.x.max(0.0).sqrt(), c.y.max(0.0).sqrt(), c.z.max(0.0).sqrt())
}

fn to_rgb8(c: Color) -> (u8, u8, u8) {
    let c = c.saturate();
    ((c.x * 255.999) as u8, (c.y * 255.999) as u8, (c.z * 255.999) as u8)
}

/// Unpacks a renderer pixel buffer, applying tone mapping and (optionally) gamma correction.
fn prepare(pixels: &[u32], tone_map: ToneMapOp, gamma: bool) -> Vec<Color> {
    pixels
        .iter()
        .map(|&p| {
            let mut c = tone_map.apply(color::from_rgba(p));
            if gamma {
                c = gamma_correct(c);
            }
            c
        })
        .collect()
}

pub fn display_pixels(
    pixels: &[u32],
    width: usize,
    height: usize,
    mode: OutputMode,
    tone_map: ToneMapOp,
    gamma: bool,
) {
    let prepared = prepare(pixels, tone_map, gamma);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match mode {
        OutputMode::Truecolor => display_truecolor(&mut out, &prepared, width, height),
        OutputMode::Halfblock => display_halfblock(&mut out, &prepared, width, height),
        OutputMode::Ascii => display_ascii(&mut out, &prepared, width, height),
        OutputMode::Braille => display_braille(&mut out, &prepared, width, height),
    }
    let _ = out.flush();
}

fn at(pixels: &[Color], width: usize, x: usize, y: usize) -> Color {
    pixels[y * width + x]
}

fn display_truecolor(out: &mut impl Write, pixels: &[Color], width: usize, height: usize) {
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = to_rgb8(at(pixels, width, x, y));
            let _ = write!(out, "{}", "█".with(style::Color::Rgb { r, g, b }));
        }
        let _ = writeln!(out);
    }
}

fn display_halfblock(out: &mut impl Write, pixels: &[Color], width: usize, height: usize) {
    let rows = height / 2;
    for row in 0..rows {
        for x in 0..width {
            let (tr, tg, tb) = to_rgb8(at(pixels, width, x, row * 2));
            let (br, bg, bb) = to_rgb8(at(pixels, width, x, row * 2 + 1));
            let _ = write!(
                out,
                "{}",
                "▀"
                    .with(style::Color::Rgb { r: tr, g: tg, b: tb })
                    .on(style::Color::Rgb { r: br, g: bg, b: bb })
            );
        }
        let _ = writeln!(out);
    }
}

fn display_ascii(out: &mut impl Write, pixels: &[Color], width: usize, height: usize) {
    const RAMP: &[u8] = b" .:-=+*#%@";
    for y in 0..height {
        for x in 0..width {
            let c = at(pixels, width, x, y);
            let lum = 0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z;
            let idx = (lum.clamp(0.0, 0.999) * RAMP.len() as f64) as usize;
            let _ = write!(out, "{}", RAMP[idx] as char);
        }
        let _ = writeln!(out);
    }
}

/// Braille pattern rendering — each Unicode braille char (U+2800..U+28FF) encodes a 2×4 dot
/// matrix, achieving 2× horizontal and 4× vertical subpixel resolution.
fn display_braille(out: &mut impl Write, pixels: &[Color], width: usize, height: usize) {
    let cell_w = 2;
    let cell_h = 4;
    let cols = width / cell_w;
    let rows = height / cell_h;

    const OFFSETS: [(usize, usize, u8); 8] = [
        (0, 0, 0),
        (0, 1, 1),
        (0, 2, 2),
        (1, 0, 3),
        (1, 1, 4),
        (1, 2, 5),
        (0, 3, 6),
        (1, 3, 7),
    ];

    for row in 0..rows {
        for col in 0..cols {
            let bx = col * cell_w;
            let by = row * cell_h;

            let mut pattern: u8 = 0;
            let mut avg_color = Color::zero();
            let mut lit_count = 0u32;

            for &(dx, dy, bit) in &OFFSETS {
                let px = bx + dx;
                let py = by + dy;
                if px < width && py < height {
                    let c = at(pixels, width, px, py);
                    let lum = 0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z;
                    if lum > 0.15 {
                        pattern |= 1 << bit;
                        avg_color += c;
                        lit_count += 1;
                    }
                }
            }

            if lit_count > 0 {
                avg_color /= lit_count as f64;
            }

            let braille_char = char::from_u32(0x2800 + pattern as u32).unwrap_or(' ');
            let (r, g, b) = to_rgb8(avg_color);
            let _ = write!(out, "{}", braille_char.to_string().with(style::Color::Rgb { r, g, b }));
        }
        let _ = writeln!(out);
    }
}
