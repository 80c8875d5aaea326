//! Pixel surfaces: paints, coverage masks and the output canvas.
//!
//! The equation renderer composites two kinds of things onto a [`Canvas`]:
//! - glyph coverage masks ([`Mask`]) filled with a solid paint,
//! - solid rectangles (fraction rules, debug guides).
//!
//! Both operations are clipped against a caller-supplied [`PixelRect`] and the
//! canvas bounds. Pixels are stored as **premultiplied** RGBA8 and blended with
//! the Porter-Duff "over" operator.
//!
//! Glyph coverage is produced by the font layer; this module only composites
//! it. Finished canvases are written as PNG or binary PPM.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::geom::PixelRect;

/// Simple RGBA color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Premultiplied RGBA8.
    fn premultiplied(self) -> [u8; 4] {
        let a = self.a.clamp(0.0, 1.0);
        let ch = |c: f32| (c.clamp(0.0, 1.0) * a * 255.0).round() as u8;
        [ch(self.r), ch(self.g), ch(self.b), (a * 255.0).round() as u8]
    }
}

/// Error returned when parsing a `#rrggbb` / `#rrggbbaa` color.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
pub struct ParseColorError(String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| err())
        };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 1.0 },
        })
    }
}

/// 8-bit coverage mask. `alpha[y * width + x]` is the coverage of pixel `(x, y)`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mask")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Mask {
    /// A mask with uniform coverage.
    pub fn filled(width: u32, height: u32, alpha: u8) -> Self {
        Self {
            width,
            height,
            alpha: vec![alpha; width as usize * height as usize],
        }
    }

    /// Wrap row-major coverage, or `None` when `alpha` is not `width * height`
    /// bytes long.
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        (alpha.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            alpha,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Coverage at `(x, y)`; zero outside the mask.
    #[inline]
    pub fn at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return 0;
        }
        self.alpha[y as usize * self.width as usize + x as usize]
    }
}

/// Premultiplied RGBA8 pixel surface.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// A fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 4]; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> PixelRect {
        PixelRect::from_size(self.width as i32, self.height as i32)
    }

    /// Premultiplied RGBA8 at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Raw premultiplied RGBA8 pixels, row-major.
    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Paint the whole canvas.
    pub fn fill(&mut self, paint: Rgba) {
        let bounds = self.bounds();
        self.fill_rect(bounds, paint, bounds);
    }

    /// Composite a solid rectangle, restricted to `clip`.
    pub fn fill_rect(&mut self, rect: PixelRect, paint: Rgba, clip: PixelRect) {
        let r = rect.intersect(&clip).intersect(&self.bounds());
        let src = paint.premultiplied();
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                self.blend(x, y, src, 255);
            }
        }
    }

    /// Composite `paint` through `mask` whose top-left pixel lands on
    /// `(dst.x0, dst.y0)`, restricted to `dst ∩ clip`.
    pub fn draw_mask(&mut self, dst: PixelRect, paint: Rgba, mask: &Mask, clip: PixelRect) {
        let r = dst.intersect(&clip).intersect(&self.bounds());
        let src = paint.premultiplied();
        for y in r.y0..r.y1 {
            for x in r.x0..r.x1 {
                let m = mask.at(x - dst.x0, y - dst.y0);
                if m > 0 {
                    self.blend(x, y, src, m);
                }
            }
        }
    }

    /// `dst = src * m + dst * (1 - src_a * m)`, all channels premultiplied.
    #[inline]
    fn blend(&mut self, x: i32, y: i32, src: [u8; 4], m: u8) {
        let idx = y as usize * self.width as usize + x as usize;
        let dst = &mut self.pixels[idx];
        let m = m as u32;
        let inv = 255 * 255 - src[3] as u32 * m;
        for ch in 0..4 {
            let v = (src[ch] as u32 * m * 255 + dst[ch] as u32 * inv + 255 * 255 / 2) / (255 * 255);
            dst[ch] = v.min(255) as u8;
        }
    }

    /// Write an 8-bit RGBA PNG with straight alpha.
    pub fn write_png<W: Write>(&self, out: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(out, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;

        let data: Vec<u8> = self.pixels.iter().flat_map(|px| unpremultiply(*px)).collect();
        writer.write_image_data(&data)?;
        writer.finish()
    }

    /// Write a binary PPM (P6), flattening alpha over a white backdrop.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.pixels.chunks(self.width.max(1) as usize) {
            row.clear();
            for px in line {
                let backdrop = 255 - px[3];
                row.extend([
                    px[0].saturating_add(backdrop),
                    px[1].saturating_add(backdrop),
                    px[2].saturating_add(backdrop),
                ]);
            }
            out.write_all(&row)?;
        }
        out.flush()
    }
}

#[inline]
fn unpremultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0; 4];
    }
    let ch = |c: u8| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
    [ch(r), ch(g), ch(b), a]
}
