use std::fmt;

use crate::equation::{DrawContext, Measured, NodeError, measured};
use crate::geom::{Fixed, PixelRect, Point, Size};

/// A run of text rendered as-is.
#[derive(Debug)]
pub struct Term {
    content: Vec<char>,
    layout: Option<Measured<()>>,
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        self.content == other.content
    }
}

impl Term {
    pub fn new(content: &str) -> Self {
        Self::from_chars(content.chars().collect())
    }

    pub fn from_chars(content: Vec<char>) -> Self {
        Self {
            content,
            layout: None,
        }
    }

    #[inline]
    pub fn content(&self) -> &[char] {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.iter().collect()
    }

    /// Whether this is the literal `s`.
    pub(crate) fn is(&self, s: &str) -> bool {
        self.content.iter().copied().eq(s.chars())
    }

    pub fn bounds(&self) -> Option<Size> {
        self.layout.as_ref().map(|m| m.size)
    }

    pub(crate) fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        self.layout = None;

        let mut prev: Option<char> = None;
        let mut width = Fixed::ZERO;
        for &c in &self.content {
            let face = dc.face_for(c);
            let Some(advance) = face.glyph_advance(c) else {
                continue;
            };
            let kern = prev.map_or(Fixed::ZERO, |p| face.kern(p, c));
            width += advance + kern;
            prev = Some(c);
        }

        let margin = dc.config().term_margin;
        let size = Size::new(
            width + margin.width,
            dc.face().metrics().height + margin.height,
        );
        self.layout = Some(Measured::new(size, dc, ()));
        Ok(size)
    }

    pub(crate) fn draw(&self, dc: &mut DrawContext, mut pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        measured(&self.layout, dc)?;

        let margin = dc.config().term_margin;
        let blocks = dc.config().debug.term_blocks;
        pos.x += margin.width / 2;
        pos.y += dc.face().metrics().ascent + margin.height / 2;

        let mut prev: Option<char> = None;
        for &c in &self.content {
            let face = dc.face_for(c);
            let kern = prev.map_or(Fixed::ZERO, |p| face.kern(p, c));
            let Some(mut glyph) = face.glyph(Point::new(pos.x + kern, pos.y), c) else {
                continue;
            };
            if blocks {
                glyph.mask = crate::scene::Mask::filled(
                    glyph.rect.width() as u32,
                    glyph.rect.height() as u32,
                    100,
                );
            }
            dc.paint_glyph(&glyph, clip)?;
            pos.x += kern + glyph.advance;
            prev = Some(c);
        }
        Ok(())
    }
}

/// Lone operators print bare; other terms are quoted when they contain
/// characters the notation would otherwise split on.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.text();
        let is_operator = matches!(self.content[..], ['+' | '-' | '*' | '/']);
        let needs_quotes = !is_operator
            && (text.is_empty()
                || text
                    .chars()
                    .any(|c| matches!(c, ' ' | ',' | '(' | ')' | '+' | '-' | '*' | '/' | '\'' | '"')));
        match (needs_quotes, text.contains('\'')) {
            (false, _) => f.write_str(&text),
            (true, false) => write!(f, "'{text}'"),
            (true, true) => write!(f, "\"{text}\""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::testing::{ADVANCE, MISSING, fake_context};
    use crate::scene::Rgba;

    #[test]
    fn width_sums_advances_and_margin() {
        let dc = fake_context(24.0);
        let tests = [
            ("1", 1),
            ("hello", 5),
            ("mx", 2),
            // Missing glyphs neither error nor advance.
            ("1\u{FFFF}2", 2),
        ];
        for (content, glyphs) in tests {
            let mut term = Term::new(content);
            let size = term.layout(&dc).unwrap();
            assert_eq!(Fixed::from_int(ADVANCE * glyphs + 6), size.width, "{content:?}");
            assert_eq!(Fixed::from_int(24 + 3), size.height, "{content:?}");
        }
        assert_eq!(None, dc.face().glyph_advance(MISSING));
    }

    #[test]
    fn kerning_applies_between_pairs() {
        let dc = fake_context(24.0);
        let mut term = Term::new("AV");
        let size = term.layout(&dc).unwrap();
        assert_eq!(Fixed::from_int(2 * ADVANCE - 1 + 6), size.width);
    }

    #[test]
    fn empty_term_is_just_margins() {
        let dc = fake_context(24.0);
        let mut term = Term::new("");
        assert_eq!(Size::px(6, 27), term.layout(&dc).unwrap());
    }

    #[test]
    fn draw_paints_glyphs_inside_margins() {
        let mut dc = fake_context(24.0);
        let mut node = crate::equation::Node::term("1");
        let canvas = dc.draw_rgba(&mut node, None).unwrap();
        assert_eq!((16, 27), (canvas.width(), canvas.height()));
        // Glyph box spans x in [3, 13), from the ascent line down to the baseline.
        assert_eq!(Some([0, 0, 0, 255]), canvas.pixel(3, 5));
        assert_eq!(Some([0, 0, 0, 0]), canvas.pixel(1, 5));
        assert_eq!(Some([0, 0, 0, 0]), canvas.pixel(14, 5));
    }

    #[test]
    fn debug_blocks_are_translucent() {
        let mut dc = fake_context(24.0);
        let mut config = dc.config().clone();
        config.debug.term_blocks = true;
        dc.set_config(config);
        dc.set_foreground(Rgba::BLACK);

        let mut node = crate::equation::Node::term("1");
        let canvas = dc.draw_rgba(&mut node, None).unwrap();
        assert_eq!(Some([0, 0, 0, 100]), canvas.pixel(3, 5));
    }

    #[test]
    fn display_quotes_when_needed() {
        assert_eq!("mx", Term::new("mx").to_string());
        assert_eq!("+", Term::new("+").to_string());
        assert_eq!("'a+b'", Term::new("a+b").to_string());
        assert_eq!("'a b'", Term::new("a b").to_string());
        assert_eq!("\"it's\"", Term::new("it's").to_string());
    }
}
