//! Resolved styles, style patches, and the overlay style set.

use std::sync::Arc;

use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Text attribute flags.
    ///
    /// Maps directly to the ECMA-48 SGR attribute family.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u16 {
        const BOLD          = 1 << 0;
        const DIM           = 1 << 1;
        const ITALIC        = 1 << 2;
        const UNDERLINE     = 1 << 3;
        const BLINK         = 1 << 4;
        const REVERSE       = 1 << 5;
        const STRIKETHROUGH = 1 << 6;
        const OVERLINE      = 1 << 7;
    }
}

/// Resolved style carried by a display cell.
///
/// `fg`/`bg` of `None` mean "inherit": the drawing layer falls back to
/// whatever is underneath (normally the terminal default).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub flags: StyleFlags,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    /// OSC 8 hyperlink target.
    pub url: Option<Arc<str>>,
    /// OSC 8 hyperlink id parameter.
    pub url_id: Option<Arc<str>>,
}

impl Style {
    /// Apply a patch to this style, returning the merged style.
    ///
    /// Off-bits are cleared before on-bits are set, so a patch carrying
    /// both for the same attribute leaves the attribute on. Colors
    /// replace only when the patch carries one.
    #[must_use]
    pub fn apply(&self, patch: &StylePatch) -> Style {
        let mut out = self.clone();
        out.flags &= !patch.clear;
        out.flags |= patch.set;
        if patch.fg.is_some() {
            out.fg = patch.fg;
        }
        if patch.bg.is_some() {
            out.bg = patch.bg;
        }
        out
    }

    /// Set the hyperlink target, consuming the style.
    #[must_use]
    pub fn with_url(mut self, url: Option<Arc<str>>) -> Style {
        self.url = url;
        self
    }
}

/// A style delta.
///
/// SGR parameter strings parse into patches, and every overlay style is
/// configured as one. A default patch is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StylePatch {
    /// Attributes switched on.
    pub set: StyleFlags,
    /// Attributes explicitly switched off (SGR 22-29, 55).
    pub clear: StyleFlags,
    /// Foreground replacement; `None` inherits.
    pub fg: Option<Color>,
    /// Background replacement; `None` inherits.
    pub bg: Option<Color>,
}

impl StylePatch {
    /// A patch that changes nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether this patch is a no-op.
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::default()
    }

    /// Turn an attribute on, clearing a pending off-bit for it.
    pub fn enable(&mut self, flag: StyleFlags) {
        self.set |= flag;
        self.clear &= !flag;
    }

    /// Turn an attribute off, clearing a pending on-bit for it.
    pub fn disable(&mut self, flag: StyleFlags) {
        self.clear |= flag;
        self.set &= !flag;
    }

    /// Builder convenience used by overlay configuration.
    #[must_use]
    pub fn with(mut self, flag: StyleFlags) -> Self {
        self.enable(flag);
        self
    }

    /// Builder convenience for the foreground color.
    #[must_use]
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Builder convenience for the background color.
    #[must_use]
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }
}

/// Overlay styles for the painter passes, all expressed as patches.
///
/// The defaults mirror a conservative terminal look: search hits reverse
/// the cell, the column cursor is bold, alternate rows dim, and sticky
/// header rows render bold.
#[derive(Debug, Clone)]
pub struct StyleSet {
    pub search_highlight: StylePatch,
    pub column_highlight: StylePatch,
    pub header: StylePatch,
    pub section_header: StylePatch,
    pub alternate: StylePatch,
    /// Color rotation for multi-color words and the column rainbow.
    pub rotation: Vec<StylePatch>,
}

impl Default for StyleSet {
    fn default() -> Self {
        let rotation = [196, 208, 226, 46, 33, 129]
            .into_iter()
            .map(|n| StylePatch::default().fg(Color::Palette(n)))
            .collect();
        Self {
            search_highlight: StylePatch::default().with(StyleFlags::REVERSE),
            column_highlight: StylePatch::default().with(StyleFlags::BOLD),
            header: StylePatch::default().with(StyleFlags::BOLD),
            section_header: StylePatch::default().with(StyleFlags::BOLD),
            alternate: StylePatch::default().with(StyleFlags::DIM),
            rotation,
        }
    }
}
