//! The draw context: fonts, paint and canvas shared by one layout/draw pass.

use std::path::PathBuf;

use crate::equation::{LayoutConfig, Node, NodeError, RenderError};
use crate::font::resolve::{default_italic_query, default_regular_query};
use crate::font::{Face, FontError, FontPaths, FontQuery, FontSource, FontSystem, Glyph};
use crate::geom::{Fixed, PixelRect, Point};
use crate::scene::{Canvas, Rgba};

/// Options for [`DrawContext::new`].
#[derive(Debug, Clone)]
pub struct ContextOptions {
    /// Nominal text size in pixels.
    pub font_size: f32,
    pub regular: FontQuery,
    pub italic: FontQuery,
    /// Load the platform's system fonts.
    pub system_fonts: bool,
    pub font_dirs: Vec<PathBuf>,
    pub font_files: Vec<PathBuf>,
    pub foreground: Rgba,
    pub layout: LayoutConfig,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            regular: default_regular_query(),
            italic: default_italic_query(),
            system_fonts: true,
            font_dirs: Vec::new(),
            font_files: Vec::new(),
            foreground: Rgba::BLACK,
            layout: LayoutConfig::default(),
        }
    }
}

/// Rendering state shared by every node of a tree during a pass.
///
/// Layout reads the fonts and config; draw additionally writes to the canvas,
/// which is only attached for the duration of [`DrawContext::draw_rgba`].
///
/// Changing the font size or the config bumps the context's generation. Nodes
/// remember the generation they were laid out under and refuse to draw with a
/// stale layout.
#[derive(Debug)]
pub struct DrawContext {
    font_size: f32,
    regular: Box<dyn FontSource>,
    italic: Box<dyn FontSource>,
    face: Box<dyn Face>,
    italic_face: Box<dyn Face>,
    foreground: Rgba,
    config: LayoutConfig,
    generation: u64,
    canvas: Option<Canvas>,
}

impl DrawContext {
    /// Discover fonts and resolve the upright and italic faces.
    pub fn new(options: &ContextOptions) -> Result<Self, FontError> {
        let fonts = FontSystem::with_paths(&FontPaths {
            system: options.system_fonts,
            dirs: options.font_dirs.clone(),
            files: options.font_files.clone(),
        })?;
        let regular = fonts.resolve(&options.regular)?;
        let italic = fonts.resolve(&options.italic)?;
        log::debug!(
            "resolved faces: regular={:?} italic={:?}",
            regular.family,
            italic.family
        );

        let mut dc = Self::from_sources(Box::new(regular), Box::new(italic), options.font_size)?;
        dc.foreground = options.foreground;
        dc.config = options.layout.clone();
        Ok(dc)
    }

    /// Build a context from caller-supplied font sources.
    pub fn from_sources(
        regular: Box<dyn FontSource>,
        italic: Box<dyn FontSource>,
        font_size: f32,
    ) -> Result<Self, FontError> {
        let face = regular.face(font_size)?;
        let italic_face = italic.face(font_size)?;
        Ok(Self {
            font_size,
            regular,
            italic,
            face,
            italic_face,
            foreground: Rgba::BLACK,
            config: LayoutConfig::default(),
            generation: 0,
            canvas: None,
        })
    }

    #[inline]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Change the nominal size. Invalidates existing layouts.
    pub fn set_font_size(&mut self, font_size: f32) -> Result<(), FontError> {
        let face = self.regular.face(font_size)?;
        let italic_face = self.italic.face(font_size)?;
        self.font_size = font_size;
        self.face = face;
        self.italic_face = italic_face;
        self.generation += 1;
        Ok(())
    }

    #[inline]
    pub fn foreground(&self) -> Rgba {
        self.foreground
    }

    pub fn set_foreground(&mut self, paint: Rgba) {
        self.foreground = paint;
    }

    #[inline]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the layout config. Invalidates existing layouts.
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.generation += 1;
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Upright face at the nominal size.
    #[inline]
    pub fn face(&self) -> &dyn Face {
        self.face.as_ref()
    }

    /// Italic face at the nominal size.
    #[inline]
    pub fn italic_face(&self) -> &dyn Face {
        self.italic_face.as_ref()
    }

    /// Lowercase ASCII letters are set in italics, everything else upright.
    #[inline]
    pub fn face_for(&self, ch: char) -> &dyn Face {
        if ch.is_ascii_lowercase() {
            self.italic_face()
        } else {
            self.face()
        }
    }

    /// The smallest upright face, at or above the nominal size, whose line
    /// height covers `height`.
    ///
    /// Sizes grow one pixel at a time and stay below `config.max_font_size`. If
    /// no size qualifies, the largest size tried is returned.
    pub(crate) fn face_covering(&self, height: Fixed) -> Result<Box<dyn Face>, FontError> {
        let mut size = self.font_size;
        let mut face = self.regular.face(size)?;
        while face.metrics().height < height {
            if size + 1.0 >= self.config.max_font_size {
                log::warn!(
                    "no font size below {} covers height {height}; using size {size}",
                    self.config.max_font_size
                );
                break;
            }
            size += 1.0;
            face = self.regular.face(size)?;
        }
        Ok(face)
    }

    fn canvas_mut(&mut self) -> Result<&mut Canvas, NodeError> {
        self.canvas.as_mut().ok_or(NodeError::NoCanvas)
    }

    /// Composite a glyph with the foreground paint.
    pub(crate) fn paint_glyph(&mut self, glyph: &Glyph, clip: PixelRect) -> Result<(), NodeError> {
        let paint = self.foreground;
        self.canvas_mut()?.draw_mask(glyph.rect, paint, &glyph.mask, clip);
        Ok(())
    }

    /// Fill a solid rectangle.
    pub(crate) fn fill_rect(
        &mut self,
        rect: PixelRect,
        paint: Rgba,
        clip: PixelRect,
    ) -> Result<(), NodeError> {
        self.canvas_mut()?.fill_rect(rect, paint, clip);
        Ok(())
    }

    /// Lay out `node`, allocate a canvas of its size and draw it.
    ///
    /// When `background` is set the canvas is filled with it first; otherwise it
    /// starts fully transparent.
    pub fn draw_rgba(
        &mut self,
        node: &mut Node,
        background: Option<Rgba>,
    ) -> Result<Canvas, RenderError> {
        let size = node.layout(self).map_err(RenderError::Layout)?;
        let (width, height) = (size.width.ceil().max(0), size.height.ceil().max(0));
        log::debug!("canvas {width}x{height} for {node}");

        let mut canvas = Canvas::new(width as u32, height as u32);
        if let Some(background) = background {
            canvas.fill(background);
        }
        let clip = canvas.bounds();

        self.canvas = Some(canvas);
        let drawn = node.draw(self, Point::ZERO, clip);
        let canvas = self.canvas.take();
        drawn.map_err(RenderError::Draw)?;
        canvas.ok_or(RenderError::Draw(NodeError::NoCanvas))
    }
}
