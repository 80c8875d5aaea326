use crate::equation::{DrawContext, Measured, Node, NodeError, measured};
use crate::font::Face;
use crate::geom::{Fixed, PixelRect, Point, Size};
use crate::scene::Rgba;

const SURD: char = '√';
const MACRON: char = '¯';

/// Length of the radical guide lines painted by `DebugOverlay::root_guides`.
const GUIDE_LENGTH: i32 = 22;

/// A node under a radical sign.
#[derive(Debug)]
pub struct Root {
    term: Box<Node>,
    layout: Option<Measured<RootGeometry>>,
}

/// What draw needs from layout: the searched face and the overbar extent.
#[derive(Debug)]
struct RootGeometry {
    face: Box<dyn Face>,
    overbar_count: i32,
    overbar_width: Fixed,
}

impl PartialEq for Root {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Root {
    pub fn new(term: Node) -> Self {
        Self {
            term: Box::new(term),
            layout: None,
        }
    }

    #[inline]
    pub fn term(&self) -> &Node {
        &self.term
    }

    pub fn bounds(&self) -> Option<Size> {
        self.layout.as_ref().map(|m| m.size)
    }

    pub(crate) fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        self.layout = None;

        let config = dc.config();
        let term = self.term.layout(dc)?;
        let mut size = Size::new(
            term.width + config.root_padding.width,
            term.height + config.root_padding.height,
        );

        let face = dc.face_covering(size.height)?;
        size.height = size.height.max(face.metrics().height);

        // Repeat the overbar glyph until it spans the radicand.
        let (overbar_count, overbar_width) = match face.glyph_advance(MACRON) {
            Some(advance) if advance.ceil() > 0 => {
                let count = (size.width.ceil() + advance.ceil() - 1) / advance.ceil();
                (count, advance * count)
            }
            _ => (0, Fixed::ZERO),
        };
        size.width = size.width.max(overbar_width);

        size.width += face.glyph_advance(SURD).unwrap_or(Fixed::ZERO) + config.root_margin.width;
        size.height += config.root_margin.height;

        let geometry = RootGeometry {
            face,
            overbar_count,
            overbar_width,
        };
        self.layout = Some(Measured::new(size, dc, geometry));
        Ok(size)
    }

    pub(crate) fn draw(&self, dc: &mut DrawContext, mut pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        let geometry = &measured(&self.layout, dc)?.data;
        let face = geometry.face.as_ref();
        let metrics = face.metrics();
        let config = dc.config();
        let padding = config.root_padding;
        let guides = config.debug.root_guides;
        pos.x += config.root_margin.width / 2;
        pos.y += config.root_margin.height / 2;
        let origin = pos;

        pos.y += metrics.ascent;
        match face.glyph(pos, SURD) {
            Some(glyph) => {
                dc.paint_glyph(&glyph, clip)?;
                pos.x += glyph.advance;
            }
            None => log::debug!("face has no radical glyph"),
        }

        if geometry.overbar_count > 0 {
            // Start half a pixel into the radical so the two join.
            let mut bar = Point::new(pos.x - Fixed(32), pos.y + overbar_offset(face));
            for _ in 0..geometry.overbar_count {
                let Some(glyph) = face.glyph(bar, MACRON) else {
                    break;
                };
                dc.paint_glyph(&glyph, clip)?;
                bar.x += glyph.advance;
            }
        }

        let term = self.term.laid_out_size()?;
        pos.x += ((geometry.overbar_width - term.width) / 2).max(Fixed::ZERO);
        pos.y += padding.height - metrics.ascent;
        self.term.draw(dc, pos, clip)?;

        if guides {
            let x0 = origin.x.floor();
            let guide = |y: Fixed| PixelRect::new(x0, y.round(), x0 + GUIDE_LENGTH, y.round() + 1);
            let baseline = origin.y + metrics.ascent - metrics.descent;
            dc.fill_rect(guide(baseline), Rgba::new(1.0, 0.0, 0.0, 1.0), clip)?;
            dc.fill_rect(guide(origin.y + metrics.descent), Rgba::new(0.0, 0.0, 1.0, 1.0), clip)?;
            dc.fill_rect(guide(origin.y + metrics.ascent), Rgba::new(0.0, 1.0, 0.0, 1.0), clip)?;
        }
        Ok(())
    }
}

/// Vertical shift lining the overbar up with the top of the radical sign.
fn overbar_offset(face: &dyn Face) -> Fixed {
    match (face.glyph_bounds(SURD), face.glyph_bounds(MACRON)) {
        (Some(surd), Some(bar)) => surd.min.y - bar.min.y - bar.height() / 3,
        _ => Fixed::ZERO,
    }
}
