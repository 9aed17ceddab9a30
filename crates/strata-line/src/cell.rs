//! The display cell: one terminal grid position.

use smallvec::SmallVec;

use strata_style::Style;

/// One terminal grid position.
///
/// Wide runes occupy a main cell of width 2 followed by a continuation
/// cell of width 0; combining marks ride along on the preceding cell's
/// `combining` list rather than occupying cells of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The base rune. `'\0'` for wide-rune continuation cells.
    pub main: char,
    /// Combining runes attached to `main`.
    pub combining: SmallVec<[char; 2]>,
    /// Display width: 0 (continuation), 1, or 2.
    pub width: u8,
    /// Resolved style.
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    /// A blank single-width cell with the default style.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            main: ' ',
            combining: SmallVec::new(),
            width: 1,
            style: Style::default(),
        }
    }

    /// A single-width cell.
    #[must_use]
    pub fn new(main: char, style: Style) -> Self {
        Self {
            main,
            combining: SmallVec::new(),
            width: 1,
            style,
        }
    }

    /// A space cell carrying a style (tab expansion, padding).
    #[must_use]
    pub fn space(style: Style) -> Self {
        Self::new(' ', style)
    }

    /// A wide rune as a `(main, continuation)` pair.
    #[must_use]
    pub fn wide(main: char, style: Style) -> (Self, Self) {
        let lead = Self {
            main,
            combining: SmallVec::new(),
            width: 2,
            style: style.clone(),
        };
        let continuation = Self {
            main: '\0',
            combining: SmallVec::new(),
            width: 0,
            style,
        };
        (lead, continuation)
    }

    /// Whether this is the zero-width tail of a wide rune.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        self.width == 0 && self.main == '\0'
    }

    /// Whether this cell displays as a plain space.
    ///
    /// Continuation cells are not spaces; the column analyzer relies on
    /// that when scanning for word boundaries across CJK text.
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.width == 1 && self.main == ' ' && self.combining.is_empty()
    }
}
