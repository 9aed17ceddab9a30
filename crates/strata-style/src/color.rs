//! Color representation for pager cells.

use std::fmt;

/// Color of a cell's foreground or background.
///
/// Supports the standard terminal color model hierarchy:
/// default → 256 indexed → 24-bit RGB. The classic 16 named colors are
/// the first 16 palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Terminal default (SGR 39 / SGR 49).
    Default,
    /// 256-color palette index (0-255). Entries 0-7 are the standard
    /// colors, 8-15 the bright variants.
    Palette(u8),
    /// 24-bit true color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Palette entry for an SGR index, rejecting out-of-range values.
    ///
    /// Mirrors the palette lookup in the escape-sequence layer: anything
    /// outside 0-255 carries no color information.
    #[must_use]
    pub fn palette(index: i64) -> Option<Self> {
        if (0..=255).contains(&index) {
            Some(Self::Palette(index as u8))
        } else {
            None
        }
    }

    /// RGB color from individual channels, rejecting out-of-range values.
    #[must_use]
    pub fn rgb(r: i64, g: i64, b: i64) -> Option<Self> {
        let ok = |v: i64| (0..=255).contains(&v);
        if ok(r) && ok(g) && ok(b) {
            Some(Self::Rgb(r as u8, g as u8, b as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Palette(n) => write!(f, "{n}"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}
