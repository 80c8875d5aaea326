//! Faces: a font resolved to a specific pixel size.
//!
//! [`Face`] is the seam between the equation layout engine and font handling.
//! Everything is reported in 26.6 fixed-point pixels with Y pointing down, so a
//! glyph's bounds above the baseline have negative `y`.
//!
//! [`TtfFace`] implements it on top of `ttf-parser` for metrics/kerning and
//! `swash` for scaling outlines into 8-bit coverage masks.

use std::cell::RefCell;
use std::fmt;

use swash::FontRef;
use swash::scale::{Render, ScaleContext, Source};
use swash::zeno::{Format, Vector};
use ttf_parser::GlyphId;

use crate::font::{FontError, ResolvedFace};
use crate::geom::{Fixed, FixedRect, PixelRect, Point};
use crate::scene::Mask;

/// Vertical metrics of a face at its pixel size.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    /// Baseline to the top of typical glyphs (positive).
    pub ascent: Fixed,
    /// Baseline to the bottom of typical glyphs (positive).
    pub descent: Fixed,
    /// Recommended distance between consecutive baselines.
    pub height: Fixed,
}

/// A rasterized glyph ready for compositing.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Destination rectangle on the canvas; mask pixel (0, 0) lands on
    /// `(rect.x0, rect.y0)`.
    pub rect: PixelRect,
    pub mask: Mask,
    /// Horizontal pen advance.
    pub advance: Fixed,
}

/// A font at a fixed pixel size.
pub trait Face: fmt::Debug {
    fn metrics(&self) -> FaceMetrics;

    /// Advance width of `ch`, or `None` when the face has no glyph for it.
    fn glyph_advance(&self, ch: char) -> Option<Fixed>;

    /// Kerning adjustment between two adjacent code points.
    fn kern(&self, left: char, right: char) -> Fixed;

    /// Ink bounds of `ch` relative to a pen on the baseline at the origin.
    fn glyph_bounds(&self, ch: char) -> Option<FixedRect>;

    /// Rasterize `ch` with the pen (on the baseline) at `dot`.
    fn glyph(&self, dot: Point, ch: char) -> Option<Glyph>;
}

/// Produces faces of one font at arbitrary sizes.
pub trait FontSource: fmt::Debug {
    fn face(&self, size_px: f32) -> Result<Box<dyn Face>, FontError>;
}

impl FontSource for ResolvedFace {
    fn face(&self, size_px: f32) -> Result<Box<dyn Face>, FontError> {
        Ok(Box::new(TtfFace::new(self.clone(), size_px)?))
    }
}

/// `ttf-parser` + `swash` backed face.
pub struct TtfFace {
    font: ResolvedFace,
    size_px: f32,
    scale: f32,
    metrics: FaceMetrics,
    /// Scratch buffers reused across glyphs.
    scaler: RefCell<ScaleContext>,
}

impl fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtfFace")
            .field("family", &self.font.family)
            .field("size_px", &self.size_px)
            .finish_non_exhaustive()
    }
}

impl TtfFace {
    pub fn new(font: ResolvedFace, size_px: f32) -> Result<Self, FontError> {
        if !(size_px.is_finite() && size_px > 0.0) {
            return Err(FontError::InvalidSize(size_px));
        }
        let scale = font.font_units_to_px_scale(size_px);
        let vm = font.v_metrics;
        let metrics = FaceMetrics {
            ascent: Fixed::from_f32(vm.ascender * scale),
            descent: Fixed::from_f32(-vm.descender * scale),
            height: Fixed::from_f32((vm.ascender - vm.descender + vm.line_gap) * scale),
        };
        Ok(Self {
            font,
            size_px,
            scale,
            metrics,
            scaler: RefCell::new(ScaleContext::new()),
        })
    }

    fn parsed(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.font.bytes, self.font.index).ok()
    }

    #[inline]
    fn px(&self, font_units: f32) -> Fixed {
        Fixed::from_f32(font_units * self.scale)
    }
}

impl Face for TtfFace {
    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn glyph_advance(&self, ch: char) -> Option<Fixed> {
        let face = self.parsed()?;
        let gid = face.glyph_index(ch)?;
        let advance = face.glyph_hor_advance(gid)?;
        Some(self.px(advance as f32))
    }

    fn kern(&self, left: char, right: char) -> Fixed {
        let Some(face) = self.parsed() else {
            return Fixed::ZERO;
        };
        let (Some(l), Some(r)) = (face.glyph_index(left), face.glyph_index(right)) else {
            return Fixed::ZERO;
        };
        let Some(kern) = face.tables().kern else {
            return Fixed::ZERO;
        };
        kern.subtables
            .into_iter()
            .filter(|st| st.horizontal && !st.variable && !st.has_cross_stream)
            .find_map(|st| st.glyphs_kerning(l, r))
            .map_or(Fixed::ZERO, |v| self.px(v as f32))
    }

    fn glyph_bounds(&self, ch: char) -> Option<FixedRect> {
        let face = self.parsed()?;
        let gid = face.glyph_index(ch)?;
        let bb = face.glyph_bounding_box(gid)?;
        Some(FixedRect {
            min: Point::new(self.px(bb.x_min as f32), -self.px(bb.y_max as f32)),
            max: Point::new(self.px(bb.x_max as f32), -self.px(bb.y_min as f32)),
        })
    }

    fn glyph(&self, dot: Point, ch: char) -> Option<Glyph> {
        let face = self.parsed()?;
        let gid = face.glyph_index(ch)?;
        let advance = self.px(face.glyph_hor_advance(gid).unwrap_or(0) as f32);
        Some(self.rasterize(gid, dot, advance))
    }
}

impl TtfFace {
    /// Scale the outline of `gid` with the pen at `dot`. The pen row is
    /// rounded to a whole pixel; the column keeps its fraction as a subpixel
    /// offset. Glyphs without ink (space) get an empty mask but keep their
    /// advance.
    fn rasterize(&self, gid: GlyphId, dot: Point, advance: Fixed) -> Glyph {
        let empty = Glyph {
            rect: PixelRect::default(),
            mask: Mask::default(),
            advance,
        };
        let Some(font) = FontRef::from_index(&self.font.bytes, self.font.index as usize) else {
            log::warn!("{}: swash cannot read face {}", self.font.family, self.font.index);
            return empty;
        };

        let pen_x = dot.x.floor();
        let fract_x = dot.x.to_f32() - pen_x as f32;
        let image = {
            let mut context = self.scaler.borrow_mut();
            let mut scaler = context.builder(font).size(self.size_px).hint(false).build();
            Render::new(&[Source::Outline])
                .format(Format::Alpha)
                .offset(Vector::new(fract_x, 0.0))
                .render(&mut scaler, gid.0)
        };
        let Some(image) = image else {
            return empty;
        };

        let p = image.placement;
        let Some(mask) = Mask::from_alpha(p.width, p.height, image.data) else {
            log::warn!("glyph {}: unexpected coverage buffer size", gid.0);
            return empty;
        };
        let x0 = pen_x + p.left;
        let y0 = dot.y.round() - p.top;
        Glyph {
            rect: PixelRect::new(x0, y0, x0 + p.width as i32, y0 + p.height as i32),
            mask,
            advance,
        }
    }
}
