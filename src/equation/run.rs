use crate::equation::{DrawContext, Measured, Node, NodeError, measured};
use crate::geom::{Fixed, PixelRect, Point, Size};

/// A horizontal series of nodes.
#[derive(Debug, Default)]
pub struct Run {
    terms: Vec<Node>,
    /// Height of the tallest child.
    layout: Option<Measured<Fixed>>,
}

impl PartialEq for Run {
    fn eq(&self, other: &Self) -> bool {
        self.terms == other.terms
    }
}

impl Run {
    pub fn new(terms: Vec<Node>) -> Self {
        Self {
            terms,
            layout: None,
        }
    }

    #[inline]
    pub fn terms(&self) -> &[Node] {
        &self.terms
    }

    pub fn bounds(&self) -> Option<Size> {
        self.layout.as_ref().map(|m| m.size)
    }

    pub(crate) fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        self.layout = None;

        let mut size = dc.config().run_margin;
        let mut tallest = Fixed::ZERO;
        for t in &mut self.terms {
            let b = t.layout(dc)?;
            size.width += b.width;
            tallest = tallest.max(b.height);
        }
        size.height += tallest;

        self.layout = Some(Measured::new(size, dc, tallest));
        Ok(size)
    }

    pub(crate) fn draw(&self, dc: &mut DrawContext, mut pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        let tallest = measured(&self.layout, dc)?.data;
        let margin = dc.config().run_margin;
        pos.x += margin.width / 2;
        pos.y += margin.height / 2;

        for t in &self.terms {
            let sz = t.laid_out_size()?;
            let adjust_y = (tallest - sz.height) / 2;
            pos.y += adjust_y;
            t.draw(dc, pos, clip)?;
            pos.y -= adjust_y;
            pos.x += sz.width;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::testing::{ADVANCE, fake_context, failing_context};

    #[test]
    fn empty_run_is_just_margins() {
        let dc = fake_context(24.0);
        let mut run = Run::default();
        assert_eq!(Size::px(4, 2), run.layout(&dc).unwrap());
    }

    #[test]
    fn widths_add_and_tallest_child_wins() {
        let dc = fake_context(24.0);
        let mut run = Run::new(vec![
            Node::term("1"),
            Node::op('+'),
            Node::div(Node::term("2"), Node::term("3")),
        ]);
        let size = run.layout(&dc).unwrap();

        let term_w = ADVANCE + 6;
        // The fraction is the tallest child: two terms, the rule and its spacing.
        let div = Size::px(term_w + 2, 27 * 2 + 2 + 8 + 8);
        assert_eq!(Fixed::from_int(term_w * 2 + 4) + div.width, size.width);
        assert_eq!(div.height + Fixed::from_int(2), size.height);
    }

    #[test]
    fn children_are_vertically_centered() {
        let mut dc = fake_context(24.0);
        let mut node = Node::run(vec![
            Node::term("1"),
            Node::div(Node::term("2"), Node::term("3")),
        ]);
        let canvas = dc.draw_rgba(&mut node, None).unwrap();

        // Term "1" (27px tall) is centered against the 72px fraction: offset
        // 1px margin + 22.5px, its glyph box starts 1.5px below that.
        let x = 2 + 3;
        assert_eq!(Some([0, 0, 0, 0]), canvas.pixel(x, 23));
        assert_eq!(Some([0, 0, 0, 255]), canvas.pixel(x, 26));
    }

    #[test]
    fn first_child_error_aborts_the_run() {
        let dc = failing_context(24.0, 25.0);
        let mut run = Run::new(vec![
            Node::term("1"),
            // Needs a face taller than the failing source allows.
            Node::paren(Node::term("2")),
            Node::term("3"),
        ]);
        assert!(run.layout(&dc).is_err());
        assert_eq!(None, run.bounds());
        assert!(run.terms()[0].bounds().is_some());
        assert_eq!(None, run.terms()[2].bounds());
    }
}
