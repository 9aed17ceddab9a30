//! The line-content builder: raw bytes to styled cells.

use std::borrow::Cow;

use strata_ansi::{EscapeConverter, Pen, SgrCache};
use strata_style::Style;

use crate::cell::Cell;
use crate::width::char_display_width;

/// Monotone map from byte offsets in a built line's text to cell indices.
///
/// Every byte of the flat string maps to the cell its rune produced
/// (continuation cells are skipped: a wide rune's bytes map to its main
/// cell, and the byte *after* it maps past the continuation). The offset
/// one past the end maps to the cell count, so any byte range over the
/// text translates directly to a cell range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosMap {
    cells: Vec<u32>,
}

impl PosMap {
    /// Cell index for a byte offset. Offsets past the end clamp to the
    /// cell count.
    #[must_use]
    pub fn cell(&self, byte: usize) -> usize {
        match self.cells.get(byte) {
            Some(&idx) => idx as usize,
            None => self.cells.last().map_or(0, |&idx| idx as usize),
        }
    }

    /// Translate a byte range to a cell range.
    #[must_use]
    pub fn cell_range(&self, range: std::ops::Range<usize>) -> std::ops::Range<usize> {
        self.cell(range.start)..self.cell(range.end)
    }

    fn push(&mut self, bytes: usize, cell_index: usize) {
        for _ in 0..bytes {
            self.cells.push(cell_index as u32);
        }
    }

    fn finish(&mut self, cell_count: usize) {
        self.cells.push(cell_count as u32);
    }
}

/// A logical line expanded into styled display cells.
#[derive(Debug, Clone, Default)]
pub struct LineC {
    /// Flat text: escapes stripped, tabs expanded, caret notation
    /// substituted. What the searcher and column analyzer see.
    pub text: String,
    /// The display cells.
    pub cells: Vec<Cell>,
    /// Byte→cell map over `text`.
    pub pos: PosMap,
    /// Style for the cleared tail of the line.
    pub eol_style: Style,
    /// False while the underlying raw line is still streaming in.
    pub valid: bool,
}

impl LineC {
    /// The empty line (used for out-of-range line numbers).
    #[must_use]
    pub fn empty() -> Self {
        let mut pos = PosMap::default();
        pos.finish(0);
        Self {
            pos,
            ..Self::default()
        }
    }

    /// Total display width in columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.width as usize).sum()
    }
}

/// Builds [`LineC`] values from raw line bytes.
#[derive(Debug, Clone)]
pub struct LineBuilder {
    tab_width: usize,
    plain: bool,
    cache: SgrCache,
}

impl LineBuilder {
    /// A builder with the given SGR cache and a tab stop of 8.
    #[must_use]
    pub fn new(cache: SgrCache) -> Self {
        Self {
            tab_width: 8,
            plain: false,
            cache,
        }
    }

    /// Set the tab stop width. Zero behaves as 1.
    #[must_use]
    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = width.max(1);
        self
    }

    /// Plain mode: escape sequences are still consumed, but cells keep
    /// the default style.
    #[must_use]
    pub fn plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// Build a line. `complete` marks whether the raw line has its
    /// terminating newline yet (streaming tails are rebuilt later).
    #[must_use]
    pub fn build(&self, raw: &[u8], complete: bool) -> LineC {
        let decoded: Cow<'_, str> = String::from_utf8_lossy(raw);
        let mut conv = EscapeConverter::new(self.cache.clone());
        let mut pen = Pen::default();
        let mut out = LineC {
            valid: complete,
            ..LineC::default()
        };
        let mut col = 0usize;

        for ch in decoded.chars() {
            if ch == '\n' {
                break;
            }
            if conv.convert(ch, &mut pen) {
                continue;
            }
            let style = if self.plain {
                Style::default()
            } else {
                pen.style.clone()
            };
            match ch {
                '\t' => {
                    let pad = self.tab_width - col % self.tab_width;
                    for _ in 0..pad {
                        self.emit(&mut out, ' ', Cell::space(style.clone()));
                        col += 1;
                    }
                }
                _ if is_control(ch) => {
                    // Caret notation: ^A .. ^_, ^? for DEL.
                    let caret = if ch == '\u{7f}' {
                        '?'
                    } else {
                        char::from_u32(ch as u32 + 0x40).unwrap_or('?')
                    };
                    self.emit(&mut out, '^', Cell::new('^', style.clone()));
                    self.emit(&mut out, caret, Cell::new(caret, style));
                    col += 2;
                }
                _ => match char_display_width(ch) {
                    0 => attach_combining(&mut out, ch),
                    2 => {
                        let (lead, cont) = Cell::wide(ch, style);
                        let index = out.cells.len();
                        out.text.push(ch);
                        out.pos.push(ch.len_utf8(), index);
                        out.cells.push(lead);
                        out.cells.push(cont);
                        col += 2;
                    }
                    _ => {
                        self.emit(&mut out, ch, Cell::new(ch, style));
                        col += 1;
                    }
                },
            }
        }

        out.eol_style = if self.plain {
            Style::default()
        } else {
            pen.eol_style
        };
        out.pos.finish(out.cells.len());
        out
    }

    fn emit(&self, out: &mut LineC, text_ch: char, cell: Cell) {
        let index = out.cells.len();
        out.text.push(text_ch);
        out.pos.push(text_ch.len_utf8(), index);
        out.cells.push(cell);
    }
}

fn is_control(ch: char) -> bool {
    (ch < ' ' && ch != '\t') || ch == '\u{7f}'
}

/// Attach a zero-width rune to the most recent base cell.
///
/// With no base cell to attach to, the rune is dropped; a bare
/// combining mark has no column of its own.
fn attach_combining(out: &mut LineC, ch: char) {
    let Some(base) = out.cells.iter().rposition(|c| c.width > 0) else {
        return;
    };
    out.cells[base].combining.push(ch);
    out.text.push(ch);
    out.pos.push(ch.len_utf8(), base);
}
