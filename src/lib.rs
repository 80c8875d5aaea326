//! `eqdraw` library crate root.
//!
//! Renders a compact ASCII equation notation (`y = mx + b/2`, `sqrt(12 - a)`)
//! into a pixel raster. The crate is primarily a **library**; the binary target
//! is a thin CLI over these entrypoints.
//!
//! Pipeline:
//! - [`equation::ascii::parse`] turns text into a [`Node`] tree.
//! - [`DrawContext`] holds the fonts and paint; [`DrawContext::draw_rgba`] lays
//!   the tree out and draws it onto a [`Canvas`] sized to fit.
//!
//! Fonts are consumed through the [`font::Face`] capability. The default
//! implementation discovers system fonts with `fontdb`, reads metrics with
//! `ttf-parser` and rasterizes glyphs with `swash`.
//!
//! Logging goes through the `log` facade; callers pick the backend.

pub mod equation;
pub mod font;
pub mod geom;
pub mod scene;

pub use equation::ascii::ParseError;
pub use equation::{ContextOptions, DrawContext, LayoutConfig, Node, NodeError, RenderError};
pub use scene::{Canvas, Rgba};

/// Parse ASCII equation notation. `Ok(None)` means the input held no terms.
pub fn parse(text: &str) -> Result<Option<Node>, ParseError> {
    equation::ascii::parse(text)
}

/// Parse `text` and draw it with `dc`.
///
/// Parse errors are reported before any layout work. Returns `Ok(None)` for
/// input with nothing to draw.
pub fn render(
    text: &str,
    dc: &mut DrawContext,
    background: Option<Rgba>,
) -> Result<Option<Canvas>, RenderError> {
    let Some(mut node) = parse(text)? else {
        log::debug!("nothing to render in {text:?}");
        return Ok(None);
    };
    log::debug!("parsed {text:?} as {node}");
    dc.draw_rgba(&mut node, background).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::testing::fake_context;

    #[test]
    fn render_reports_parse_errors_first() {
        let mut dc = fake_context(24.0);
        let err = render("(1 + 2", &mut dc, None).unwrap_err();
        assert!(
            matches!(err, RenderError::Parse(ParseError::UnmatchedStart)),
            "{err:?}"
        );
        assert_eq!("parse: unmatched start parenthesis", err.to_string());
    }

    #[test]
    fn render_empty_input() {
        let mut dc = fake_context(24.0);
        assert!(render("  ", &mut dc, None).unwrap().is_none());
    }

    #[test]
    fn render_fills_background() {
        let mut dc = fake_context(24.0);
        let canvas = render("y = mx + b/2", &mut dc, Some(Rgba::WHITE))
            .unwrap()
            .unwrap();
        assert_eq!(Some([255, 255, 255, 255]), canvas.pixel(0, 0));
        assert!(canvas.pixels().iter().any(|px| *px == [0, 0, 0, 255]));
    }

    #[test]
    fn layout_errors_are_tagged() {
        let mut dc = crate::equation::testing::failing_context(24.0, 25.0);
        let err = render("(1)", &mut dc, None).unwrap_err();
        assert!(matches!(err, RenderError::Layout(_)), "{err:?}");
    }
}
