//! Deterministic font stand-ins for layout tests.
//!
//! A [`FakeFace`] at size `s` has a line height of `s` pixels, ascent `0.75 s`
//! and descent `0.25 s`. Every glyph is a solid box from the ascent line down to
//! the baseline, one advance wide.

use crate::equation::DrawContext;
use crate::font::{Face, FaceMetrics, FontError, FontSource, Glyph};
use crate::geom::{Fixed, FixedRect, PixelRect, Point};
use crate::scene::Mask;

/// Advance of every ordinary character, in pixels.
pub const ADVANCE: i32 = 10;
/// Advance of `(` and `)`.
pub const PAREN_ADVANCE: i32 = 5;
/// Advance of the radical sign.
pub const SURD_ADVANCE: i32 = 12;
/// Advance of the overbar glyph.
pub const MACRON_ADVANCE: i32 = 6;
/// A character the fake face has no glyph for.
pub const MISSING: char = '\u{FFFF}';

#[derive(Debug)]
pub struct FakeFace {
    metrics: FaceMetrics,
}

impl FakeFace {
    pub fn new(size_px: f32) -> Self {
        Self {
            metrics: FaceMetrics {
                ascent: Fixed::from_f32(size_px * 0.75),
                descent: Fixed::from_f32(size_px * 0.25),
                height: Fixed::from_f32(size_px),
            },
        }
    }
}

impl Face for FakeFace {
    fn metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn glyph_advance(&self, ch: char) -> Option<Fixed> {
        let px = match ch {
            MISSING => return None,
            '(' | ')' => PAREN_ADVANCE,
            '√' => SURD_ADVANCE,
            '¯' => MACRON_ADVANCE,
            _ => ADVANCE,
        };
        Some(Fixed::from_int(px))
    }

    fn kern(&self, left: char, right: char) -> Fixed {
        match (left, right) {
            ('A', 'V') => -Fixed::ONE,
            _ => Fixed::ZERO,
        }
    }

    fn glyph_bounds(&self, ch: char) -> Option<FixedRect> {
        let advance = self.glyph_advance(ch)?;
        Some(FixedRect {
            min: Point::new(Fixed::ZERO, -self.metrics.ascent),
            max: Point::new(advance, Fixed::ZERO),
        })
    }

    fn glyph(&self, dot: Point, ch: char) -> Option<Glyph> {
        let advance = self.glyph_advance(ch)?;
        let rect = PixelRect::new(
            dot.x.floor(),
            (dot.y - self.metrics.ascent).floor(),
            (dot.x + advance).ceil(),
            dot.y.ceil(),
        );
        Some(Glyph {
            rect,
            mask: Mask::filled(rect.width() as u32, rect.height() as u32, 255),
            advance,
        })
    }
}

/// Makes [`FakeFace`]s, failing for sizes above `max`.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub max: Option<f32>,
}

impl FontSource for FakeSource {
    fn face(&self, size_px: f32) -> Result<Box<dyn Face>, FontError> {
        if self.max.is_some_and(|max| size_px > max) {
            return Err(FontError::InvalidSize(size_px));
        }
        Ok(Box::new(FakeFace::new(size_px)))
    }
}

pub fn fake_context(font_size: f32) -> DrawContext {
    DrawContext::from_sources(
        Box::new(FakeSource::default()),
        Box::new(FakeSource::default()),
        font_size,
    )
    .unwrap()
}

/// A context whose fonts cannot be sized above `max`.
pub fn failing_context(font_size: f32, max: f32) -> DrawContext {
    DrawContext::from_sources(
        Box::new(FakeSource { max: Some(max) }),
        Box::new(FakeSource { max: Some(max) }),
        font_size,
    )
    .unwrap()
}
