use crate::equation::{DrawContext, Measured, Node, NodeError, measured};
use crate::font::Face;
use crate::geom::{Fixed, PixelRect, Point, Size};

/// A node wrapped in brackets that grow to its height.
#[derive(Debug)]
pub struct Parenthesis {
    term: Option<Box<Node>>,
    /// Face at the size whose line height covers the wrapped node.
    layout: Option<Measured<Box<dyn Face>>>,
}

impl PartialEq for Parenthesis {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Parenthesis {
    pub fn new(term: Option<Node>) -> Self {
        Self {
            term: term.map(Box::new),
            layout: None,
        }
    }

    #[inline]
    pub fn term(&self) -> Option<&Node> {
        self.term.as_deref()
    }

    pub fn into_term(self) -> Option<Node> {
        self.term.map(|t| *t)
    }

    pub fn bounds(&self) -> Option<Size> {
        self.layout.as_ref().map(|m| m.size)
    }

    pub(crate) fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        self.layout = None;

        let content = match &mut self.term {
            Some(t) => t.layout(dc)?,
            None => Size::ZERO,
        };

        // Grow the bracket font until the brackets wrap the content vertically.
        let face = dc.face_covering(content.height)?;
        let open = face.glyph_advance('(').unwrap_or(Fixed::ZERO);
        let close = face.glyph_advance(')').unwrap_or(Fixed::ZERO);

        let margin = dc.config().paren_margin;
        let size = Size::new(
            content.width + open + close + margin.width,
            face.metrics().height.max(content.height) + margin.height,
        );
        self.layout = Some(Measured::new(size, dc, face));
        Ok(size)
    }

    pub(crate) fn draw(&self, dc: &mut DrawContext, mut pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        let face = &measured(&self.layout, dc)?.data;
        let margin = dc.config().paren_margin;
        let ascent = face.metrics().ascent;
        pos.x += margin.width / 2;
        pos.y += ascent + margin.height / 4;

        if let Some(glyph) = face.glyph(pos, '(') {
            dc.paint_glyph(&glyph, clip)?;
            pos.x += glyph.advance;
        }

        if let Some(t) = &self.term {
            pos.y -= ascent;
            t.draw(dc, pos, clip)?;
            pos.x += t.laid_out_size()?.width;
            pos.y += ascent;
        }

        if let Some(glyph) = face.glyph(pos, ')') {
            dc.paint_glyph(&glyph, clip)?;
        }
        Ok(())
    }
}
