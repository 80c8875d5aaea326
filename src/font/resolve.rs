//! Font face resolution policy.
//!
//! Keeps the "which font do we want" decisions out of the database plumbing:
//! - default family lists for upright and italic equation text,
//! - mapping of generic family names to `fontdb` generics,
//! - extra well-known font directories searched next to the system fonts.

use std::path::PathBuf;

use fontdb::Family;

use crate::font::FontQuery;

/// Families tried for equation text, in priority order.
const DEFAULT_FAMILIES: &[&str] = &["Liberation Sans", "DejaVu Sans", "Arial", "sans-serif"];

/// Directories searched in addition to the platform's system fonts.
/// A leading `~` expands to `$HOME`.
const EXTRA_FONT_DIRS: &[&str] = &["/usr/share/eqdraw/fonts", "~/.fonts"];

/// Default query for upright text (digits, operators, uppercase).
pub fn default_regular_query() -> FontQuery {
    FontQuery {
        families: DEFAULT_FAMILIES.iter().map(|f| f.to_string()).collect(),
        weight: 400,
        italic: false,
    }
}

/// Default query for italic text (lowercase variables).
pub fn default_italic_query() -> FontQuery {
    FontQuery {
        italic: true,
        ..default_regular_query()
    }
}

/// Map a family name to a `fontdb` family, recognizing the CSS generics.
pub fn family_from_name(name: &str) -> Family<'_> {
    if name.eq_ignore_ascii_case("serif") {
        Family::Serif
    } else if name.eq_ignore_ascii_case("sans-serif") || name.eq_ignore_ascii_case("sans") {
        Family::SansSerif
    } else if name.eq_ignore_ascii_case("monospace") || name.eq_ignore_ascii_case("mono") {
        Family::Monospace
    } else {
        Family::Name(name)
    }
}

/// The entries of [`EXTRA_FONT_DIRS`] that exist on this machine.
pub fn extra_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    EXTRA_FONT_DIRS
        .iter()
        .filter_map(|dir| match dir.strip_prefix("~/") {
            Some(rest) => home.as_ref().map(|h| h.join(rest)),
            None => Some(PathBuf::from(dir)),
        })
        .filter(|dir| dir.is_dir())
        .collect()
}
