//! Font module root.
//!
//! The equation renderer consumes fonts as a capability: "give me a face at this
//! pixel size" ([`FontSource`]) and "measure / rasterize this code point"
//! ([`Face`]). This module provides the real implementation of both:
//! - discover fonts (system + extra directories/files) via `fontdb`,
//! - resolve a requested family/weight/style to concrete font bytes,
//! - read metrics, advances and kerning via `ttf-parser`,
//! - scale glyph outlines into coverage masks with `swash` (see
//!   [`face::TtfFace`]).
//!
//! Notes:
//! - Font bytes are shared (`Arc<[u8]>`); a `ttf_parser::Face` is re-parsed per
//!   query since parsing only reads table headers.
//! - Missing glyphs are not errors at this level; queries return `None`.

pub mod face;
pub mod resolve;

use std::{path::PathBuf, sync::Arc};

use fontdb::{Database, Family, Query, Style, Weight};

pub use face::{Face, FaceMetrics, FontSource, Glyph, TtfFace};

/// Simplified font style selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontQuery {
    /// Preferred font family names, in priority order.
    /// Example: `["Liberation Sans", "DejaVu Sans", "sans-serif"]`
    pub families: Vec<String>,

    /// Weight in CSS-ish terms (100..900). 400 = regular, 700 = bold.
    pub weight: u16,

    /// Italic / oblique.
    pub italic: bool,
}

/// Basic vertical metrics needed for consistent baseline alignment.
///
/// Values are in **font units** (units-per-em).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FontVMetrics {
    pub units_per_em: f32,
    pub ascender: f32,
    pub descender: f32,
    pub line_gap: f32,
}

/// A resolved face: the font bytes plus enough information to parse them.
///
/// - `bytes` contains the full font file/collection.
/// - `index` selects the face within the collection.
/// - `v_metrics` provides units-per-em and baseline-related metrics (font units).
#[derive(Debug, Clone)]
pub struct ResolvedFace {
    pub family: String,
    pub bytes: Arc<[u8]>,
    pub index: u32,
    pub v_metrics: FontVMetrics,
}

impl ResolvedFace {
    /// Parse `bytes` (a TTF/OTF file or a collection) and read its vertical metrics.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>, index: u32) -> Result<Self, FontError> {
        let bytes = bytes.into();
        let parsed = ttf_parser::Face::parse(&bytes, index).map_err(|_| FontError::ParseFailed)?;

        let units_per_em = parsed.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return Err(FontError::ParseFailed);
        }

        // Prefer the OS/2 typographic metrics, fall back to hhea.
        let v_metrics = FontVMetrics {
            units_per_em,
            ascender: parsed
                .typographic_ascender()
                .unwrap_or_else(|| parsed.ascender()) as f32,
            descender: parsed
                .typographic_descender()
                .unwrap_or_else(|| parsed.descender()) as f32,
            line_gap: parsed
                .typographic_line_gap()
                .unwrap_or_else(|| parsed.line_gap()) as f32,
        };

        let family = parsed
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_default();

        Ok(Self {
            family,
            bytes,
            index,
            v_metrics,
        })
    }

    /// Scale factor mapping font units to pixels at `size_px`.
    #[inline]
    pub fn font_units_to_px_scale(&self, size_px: f32) -> f32 {
        size_px / self.v_metrics.units_per_em
    }
}

/// Errors produced by the font subsystem.
#[derive(thiserror::Error, Debug)]
pub enum FontError {
    #[error("no fonts found on this system or in the configured font paths")]
    NoFontsAvailable,

    #[error("failed to resolve a font face for query: {0:?}")]
    ResolveFailed(FontQuery),

    #[error("failed to parse font face")]
    ParseFailed,

    #[error("invalid font size: {0}")]
    InvalidSize(f32),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where `FontSystem` looks for fonts.
#[derive(Debug, Clone, Default)]
pub struct FontPaths {
    /// Load the platform's system fonts (plus [`resolve::extra_font_dirs`]).
    pub system: bool,
    /// Additional directories, scanned recursively.
    pub dirs: Vec<PathBuf>,
    /// Additional individual font files.
    pub files: Vec<PathBuf>,
}

/// The primary entrypoint to the font system.
///
/// Owns a `fontdb::Database` and resolves [`FontQuery`]s to [`ResolvedFace`]s.
pub struct FontSystem {
    db: Database,
}

impl FontSystem {
    /// Create a new font system and load system fonts.
    pub fn new() -> Result<Self, FontError> {
        Self::with_paths(&FontPaths {
            system: true,
            ..Default::default()
        })
    }

    /// Create a font system from an explicit set of font locations.
    pub fn with_paths(paths: &FontPaths) -> Result<Self, FontError> {
        let mut db = Database::new();
        if paths.system {
            db.load_system_fonts();
            for dir in resolve::extra_font_dirs() {
                db.load_fonts_dir(dir);
            }
        }
        for dir in &paths.dirs {
            db.load_fonts_dir(dir);
        }
        for file in &paths.files {
            db.load_font_file(file)?;
        }

        // `faces()` is an iterator; check emptiness by `next()`.
        if db.faces().next().is_none() {
            return Err(FontError::NoFontsAvailable);
        }
        log::debug!("font database holds {} faces", db.len());

        Ok(Self { db })
    }

    /// Resolve a `FontQuery` to a concrete face.
    ///
    /// Resolution strategy:
    /// - Try the named families in order with the requested weight/style.
    /// - Fall back to generic `sans-serif`, then to the first face in the database.
    pub fn resolve(&self, query: &FontQuery) -> Result<ResolvedFace, FontError> {
        let style = if query.italic {
            Style::Italic
        } else {
            Style::Normal
        };
        let weight = Weight(query.weight.clamp(1, 1000));

        let families: Vec<Family<'_>> = query
            .families
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(resolve::family_from_name)
            .collect();

        let id = self
            .query(&families, weight, style)
            .or_else(|| self.query(&[Family::SansSerif], weight, style))
            .or_else(|| {
                let first = self.db.faces().next().map(|face| face.id);
                if first.is_some() {
                    log::warn!("no face matched {query:?}; using the first available face");
                }
                first
            })
            .ok_or_else(|| FontError::ResolveFailed(query.clone()))?;

        let bytes = self
            .db
            .with_face_data(id, |data, index| (Arc::<[u8]>::from(data), index))
            .ok_or_else(|| FontError::ResolveFailed(query.clone()))?;

        ResolvedFace::from_bytes(bytes.0, bytes.1)
    }

    fn query(&self, families: &[Family<'_>], weight: Weight, style: Style) -> Option<fontdb::ID> {
        self.db.query(&Query {
            families,
            weight,
            style,
            stretch: fontdb::Stretch::Normal,
        })
    }
}
