use crate::equation::{DrawContext, Measured, Node, NodeError, measured};
use crate::geom::{Fixed, PixelRect, Point, Size};

/// A fraction: numerator stacked over denominator with a rule between them.
#[derive(Debug)]
pub struct Div {
    numerator: Box<Node>,
    denominator: Box<Node>,
    layout: Option<Measured<()>>,
}

impl PartialEq for Div {
    fn eq(&self, other: &Self) -> bool {
        self.numerator == other.numerator && self.denominator == other.denominator
    }
}

impl Div {
    pub fn new(numerator: Node, denominator: Node) -> Self {
        Self {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
            layout: None,
        }
    }

    #[inline]
    pub fn numerator(&self) -> &Node {
        &self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> &Node {
        &self.denominator
    }

    pub fn bounds(&self) -> Option<Size> {
        self.layout.as_ref().map(|m| m.size)
    }

    pub(crate) fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        self.layout = None;

        let config = dc.config();
        let num = self.numerator.layout(dc)?;
        let den = self.denominator.layout(dc)?;

        let mut size = config.div_margin;
        size.width += num.width.max(den.width);
        size.height += num.height
            + den.height
            + Fixed::from_int(config.div_rule_thickness + 2 * config.div_rule_spacing);

        self.layout = Some(Measured::new(size, dc, ()));
        Ok(size)
    }

    pub(crate) fn draw(&self, dc: &mut DrawContext, mut pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        let width = measured(&self.layout, dc)?.size.width;
        let config = dc.config();
        let thickness = config.div_rule_thickness;
        let spacing = Fixed::from_int(config.div_rule_spacing);
        pos.y += config.div_margin.height / 2;

        let num = self.numerator.laid_out_size()?;
        let adjust_x = (width - num.width) / 2;
        self.numerator.draw(dc, Point::new(pos.x + adjust_x, pos.y), clip)?;
        pos.y += num.height + spacing;

        // Inset one pixel on the left and two on the right.
        let x0 = pos.x.floor();
        let y0 = pos.y.round();
        let rule = PixelRect::new(x0 + 1, y0, x0 + width.ceil() - 2, y0 + thickness);
        let paint = dc.foreground();
        dc.fill_rect(rule, paint, clip)?;
        pos.y += Fixed::from_int(thickness) + spacing;

        let den = self.denominator.laid_out_size()?;
        let adjust_x = (width - den.width) / 2;
        self.denominator.draw(dc, Point::new(pos.x + adjust_x, pos.y), clip)
    }
}
