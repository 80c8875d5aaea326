//! Layout tuning knobs.
//!
//! Margins and spacings are whole-pixel values expressed as [`Size`]s. Every node
//! reads them from the [`DrawContext`](super::DrawContext) during layout and draw,
//! so a changed config must go through `DrawContext::set_config`, which
//! invalidates previous layouts.

use crate::geom::Size;

/// Space added around every term (split evenly on both sides).
pub const TERM_MARGIN: Size = Size::px(6, 3);
/// Space added around every run.
pub const RUN_MARGIN: Size = Size::px(4, 2);
/// Space added around a bracketed expression.
pub const PAREN_MARGIN: Size = Size::px(1, 12);
/// Space added around a fraction.
pub const DIV_MARGIN: Size = Size::px(2, 8);
/// Fraction rule thickness in pixels.
pub const DIV_RULE_THICKNESS: i32 = 2;
/// Gap between the fraction rule and each operand, in pixels.
pub const DIV_RULE_SPACING: i32 = 4;
/// Space added around a radical.
pub const ROOT_MARGIN: Size = Size::px(2, 0);
/// Space between the radicand and the radical's overbar.
pub const ROOT_PADDING: Size = Size::px(0, 2);
/// Font sizes tried when growing brackets/radicals stay below this.
pub const MAX_FONT_SIZE: f32 = 144.0;

/// Visual debugging aids.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DebugOverlay {
    /// Paint each term glyph as a translucent block instead of its shape.
    pub term_blocks: bool,
    /// Paint guide lines over radicals: baseline (red), one descent below the
    /// top (blue) and one ascent below the top (green).
    pub root_guides: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub term_margin: Size,
    pub run_margin: Size,
    pub paren_margin: Size,
    pub div_margin: Size,
    pub div_rule_thickness: i32,
    pub div_rule_spacing: i32,
    pub root_margin: Size,
    pub root_padding: Size,
    /// Exclusive upper bound of the bracket/radical font-size search.
    pub max_font_size: f32,
    pub debug: DebugOverlay,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            term_margin: TERM_MARGIN,
            run_margin: RUN_MARGIN,
            paren_margin: PAREN_MARGIN,
            div_margin: DIV_MARGIN,
            div_rule_thickness: DIV_RULE_THICKNESS,
            div_rule_spacing: DIV_RULE_SPACING,
            root_margin: ROOT_MARGIN,
            root_padding: ROOT_PADDING,
            max_font_size: MAX_FONT_SIZE,
            debug: DebugOverlay::default(),
        }
    }
}
