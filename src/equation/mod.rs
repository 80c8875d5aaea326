//! Equation trees and their two-pass layout/draw protocol.
//!
//! A tree is built once (by [`ascii::parse`] or by hand) and then rendered in two
//! recursive passes:
//! 1. [`Node::layout`] measures every node with the context's font metrics and
//!    caches the result (plus anything draw needs, e.g. a face at a searched size).
//! 2. [`Node::draw`] positions and paints the subtree from a top-left origin,
//!    reading only its own cache.
//!
//! The node kinds:
//! - [`Term`]: a leaf text run.
//! - [`Run`]: siblings laid out left to right, vertically centered.
//! - [`Parenthesis`]: one optional node between brackets sized to fit it.
//! - [`Div`]: numerator over denominator, separated by a rule.
//! - [`Root`]: one node under a radical with an overbar spanning it.
//!
//! Both passes fail fast: the first child error aborts the remaining siblings.
//! Missing glyphs are never errors.

pub mod ascii;
mod config;
mod context;
mod div;
mod parenthesis;
mod root;
mod run;
mod term;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;

pub use config::{DebugOverlay, LayoutConfig, MAX_FONT_SIZE};
pub use context::{ContextOptions, DrawContext};
pub use div::Div;
pub use parenthesis::Parenthesis;
pub use root::Root;
pub use run::Run;
pub use term::Term;

use crate::font::FontError;
use crate::geom::{PixelRect, Point, Size};

/// Failure of a layout or draw pass.
#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    #[error(transparent)]
    Font(#[from] FontError),

    #[error("node drawn before it was laid out")]
    NotLaidOut,

    #[error("node was laid out under a different font size or config")]
    StaleLayout,

    #[error("no canvas attached to the draw context")]
    NoCanvas,
}

/// Failure of [`DrawContext::draw_rgba`] / [`crate::render`], tagged with the phase.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("parse: {0}")]
    Parse(#[from] ascii::ParseError),

    #[error("layout: {0}")]
    Layout(#[source] NodeError),

    #[error("draw: {0}")]
    Draw(#[source] NodeError),
}

/// Cached result of a node's most recent successful layout.
#[derive(Debug)]
pub(crate) struct Measured<T> {
    pub size: Size,
    generation: u64,
    pub data: T,
}

impl<T> Measured<T> {
    pub fn new(size: Size, dc: &DrawContext, data: T) -> Self {
        Self {
            size,
            generation: dc.generation(),
            data,
        }
    }
}

/// The layout to draw with, provided it belongs to `dc`'s current generation.
pub(crate) fn measured<'a, T>(
    layout: &'a Option<Measured<T>>,
    dc: &DrawContext,
) -> Result<&'a Measured<T>, NodeError> {
    let m = layout.as_ref().ok_or(NodeError::NotLaidOut)?;
    if m.generation != dc.generation() {
        return Err(NodeError::StaleLayout);
    }
    Ok(m)
}

/// A node of an equation tree.
#[derive(Debug, PartialEq)]
pub enum Node {
    Term(Term),
    Run(Run),
    Parenthesis(Parenthesis),
    Div(Div),
    Root(Root),
}

impl Node {
    /// A plain text term.
    pub fn term(content: &str) -> Self {
        Node::Term(Term::new(content))
    }

    /// A single-character operator term.
    pub fn op(op: char) -> Self {
        Node::Term(Term::from_chars(vec![op]))
    }

    pub fn run(terms: Vec<Node>) -> Self {
        Node::Run(Run::new(terms))
    }

    pub fn paren(term: Node) -> Self {
        Node::Parenthesis(Parenthesis::new(Some(term)))
    }

    /// `()`
    pub fn empty_paren() -> Self {
        Node::Parenthesis(Parenthesis::new(None))
    }

    pub fn div(numerator: Node, denominator: Node) -> Self {
        Node::Div(Div::new(numerator, denominator))
    }

    pub fn root(term: Node) -> Self {
        Node::Root(Root::new(term))
    }

    /// Measure this subtree, caching every node's size.
    pub fn layout(&mut self, dc: &DrawContext) -> Result<Size, NodeError> {
        let size = match self {
            Node::Term(n) => n.layout(dc),
            Node::Run(n) => n.layout(dc),
            Node::Parenthesis(n) => n.layout(dc),
            Node::Div(n) => n.layout(dc),
            Node::Root(n) => n.layout(dc),
        }?;
        log::trace!(
            "layout {}: {}x{}",
            self.kind_name(),
            size.width,
            size.height
        );
        Ok(size)
    }

    /// Paint this subtree with its top-left corner at `pos`.
    pub fn draw(&self, dc: &mut DrawContext, pos: Point, clip: PixelRect) -> Result<(), NodeError> {
        match self {
            Node::Term(n) => n.draw(dc, pos, clip),
            Node::Run(n) => n.draw(dc, pos, clip),
            Node::Parenthesis(n) => n.draw(dc, pos, clip),
            Node::Div(n) => n.draw(dc, pos, clip),
            Node::Root(n) => n.draw(dc, pos, clip),
        }
    }

    /// Size computed by the last layout pass, `None` before one succeeded.
    pub fn bounds(&self) -> Option<Size> {
        match self {
            Node::Term(n) => n.bounds(),
            Node::Run(n) => n.bounds(),
            Node::Parenthesis(n) => n.bounds(),
            Node::Div(n) => n.bounds(),
            Node::Root(n) => n.bounds(),
        }
    }

    pub(crate) fn laid_out_size(&self) -> Result<Size, NodeError> {
        self.bounds().ok_or(NodeError::NotLaidOut)
    }

    /// Text of every term in reading order; a fraction contributes its
    /// numerator, `/`, then its denominator.
    pub fn tokens(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens(&self, out: &mut Vec<String>) {
        match self {
            Node::Term(t) => out.push(t.text()),
            Node::Run(r) => r.terms().iter().for_each(|t| t.collect_tokens(out)),
            Node::Parenthesis(p) => {
                if let Some(t) = p.term() {
                    t.collect_tokens(out);
                }
            }
            Node::Div(d) => {
                d.numerator().collect_tokens(out);
                out.push("/".to_string());
                d.denominator().collect_tokens(out);
            }
            Node::Root(r) => r.term().collect_tokens(out),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Node::Term(_) => "term",
            Node::Run(_) => "run",
            Node::Parenthesis(_) => "parenthesis",
            Node::Div(_) => "div",
            Node::Root(_) => "root",
        }
    }
}

/// Notation-like rendering for logs and debugging.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Term(t) => write!(f, "{t}"),
            Node::Run(r) => {
                for (i, t) in r.terms().iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{t}")?;
                }
                Ok(())
            }
            Node::Parenthesis(p) => match p.term() {
                Some(t) => write!(f, "({t})"),
                None => f.write_str("()"),
            },
            Node::Div(d) => write!(f, "({})/({})", d.numerator(), d.denominator()),
            Node::Root(r) => write!(f, "sqrt({})", r.term()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::fake_context;
    use super::*;
    use crate::geom::Fixed;

    fn sample() -> Node {
        Node::run(vec![
            Node::term("y"),
            Node::term("="),
            Node::div(
                Node::run(vec![Node::term("mx"), Node::op('+'), Node::term("b")]),
                Node::term("2"),
            ),
            Node::op('+'),
            Node::root(Node::paren(Node::term("c"))),
            Node::empty_paren(),
        ])
    }

    #[test]
    fn tokens_in_reading_order() {
        assert_eq!(
            vec!["y", "=", "mx", "+", "b", "/", "2", "+", "c"],
            sample().tokens()
        );
    }

    #[test]
    fn display_notation() {
        assert_eq!("y = (mx + b)/(2) + sqrt((c)) ()", sample().to_string());
    }

    #[test]
    fn bounds_undefined_until_layout() {
        let dc = fake_context(24.0);
        let mut node = sample();
        assert_eq!(None, node.bounds());

        let size = node.layout(&dc).unwrap();
        assert_eq!(Some(size), node.bounds());
        assert!(size.width > Fixed::ZERO && size.height > Fixed::ZERO);
        if let Node::Run(run) = &node {
            assert!(run.terms().iter().all(|t| t.bounds().is_some()));
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let dc = fake_context(24.0);
        let mut node = sample();
        let first = node.layout(&dc).unwrap();
        let second = node.layout(&dc).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn equality_ignores_layout_cache() {
        let dc = fake_context(24.0);
        let mut laid_out = sample();
        laid_out.layout(&dc).unwrap();
        assert_eq!(sample(), laid_out);
    }

    #[test]
    fn draw_requires_layout() {
        let mut dc = fake_context(24.0);
        let node = Node::term("x");
        let err = node.draw(&mut dc, Point::ZERO, PixelRect::from_size(10, 10)).unwrap_err();
        assert!(matches!(err, NodeError::NotLaidOut), "{err:?}");
    }

    #[test]
    fn draw_rejects_stale_layout() {
        let mut dc = fake_context(24.0);
        let mut node = Node::term("x");
        node.layout(&dc).unwrap();
        dc.set_font_size(30.0).unwrap();
        let err = node.draw(&mut dc, Point::ZERO, PixelRect::from_size(10, 10)).unwrap_err();
        assert!(matches!(err, NodeError::StaleLayout), "{err:?}");

        dc.set_config(LayoutConfig::default());
        node.layout(&dc).unwrap();
        let err = node.draw(&mut dc, Point::ZERO, PixelRect::from_size(10, 10)).unwrap_err();
        assert!(matches!(err, NodeError::NoCanvas), "{err:?}");
    }

    #[test]
    fn draw_rgba_sizes_canvas_to_bounds() {
        let mut dc = fake_context(24.0);
        let mut node = sample();
        let canvas = dc.draw_rgba(&mut node, Some(crate::scene::Rgba::WHITE)).unwrap();
        let size = node.bounds().unwrap();
        assert_eq!(size.width.ceil() as u32, canvas.width());
        assert_eq!(size.height.ceil() as u32, canvas.height());
    }
}
