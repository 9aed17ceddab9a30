//! Column boundaries by delimiter regex or fixed-width inference.

use std::ops::Range;
use std::sync::Arc;

use regex::Regex;

use strata_line::{Cell, LineC};

use crate::pattern::compile_auto;

/// Column analysis state: a delimiter regex, inferred fixed-width
/// boundary positions, or both (the display mode chooses which applies).
#[derive(Debug, Default)]
pub struct ColumnIndex {
    delimiter: Option<Regex>,
    widths: Vec<usize>,
}

impl ColumnIndex {
    /// An index with no delimiter and no inferred widths.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the column delimiter.
    ///
    /// Plain strings are quoted; degenerate regexes fall back to literal
    /// matching (see [`crate::pattern`]). An empty string clears the
    /// delimiter.
    pub fn set_delimiter(&mut self, pattern: &str) {
        self.delimiter = compile_auto(pattern);
    }

    /// Whether a delimiter is configured.
    #[must_use]
    pub fn has_delimiter(&self) -> bool {
        self.delimiter.is_some()
    }

    /// Inferred fixed-width boundary positions (cell indices).
    #[must_use]
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Cell ranges of every delimiter match in a line.
    #[must_use]
    pub fn delimiter_cell_ranges(&self, line: &LineC) -> Vec<Range<usize>> {
        let Some(re) = &self.delimiter else {
            return Vec::new();
        };
        re.find_iter(&line.text)
            .map(|m| line.pos.cell_range(m.range()))
            .collect()
    }

    /// Column cell spans for delimiter mode.
    ///
    /// Columns are the cell runs *between* delimiter matches. Text
    /// before the first delimiter is a column of its own when present;
    /// a line opening with its delimiter starts counting at the text
    /// after it. A line with no matches is a single column.
    #[must_use]
    pub fn delimited_spans(&self, line: &LineC) -> Vec<Range<usize>> {
        let matches = self.delimiter_cell_ranges(line);
        let len = line.cells.len();
        if matches.is_empty() {
            return vec![0..len];
        }
        let mut spans = Vec::with_capacity(matches.len() + 1);
        if matches[0].start > 0 {
            spans.push(0..matches[0].start);
        }
        for (i, m) in matches.iter().enumerate() {
            let stop = matches.get(i + 1).map_or(len, |next| next.start);
            spans.push(m.end..stop.max(m.end));
        }
        spans
    }

    /// Infer fixed-width boundary positions from the header rows.
    ///
    /// A cell index `p` is a boundary when *every* sampled line has a
    /// space at `p` and a non-space at `p - 1`: a word ending at the
    /// same place in each header line.
    pub fn infer_widths(&mut self, headers: &[Arc<LineC>]) {
        self.widths.clear();
        let Some(max_len) = headers.iter().map(|l| l.cells.len()).max() else {
            return;
        };
        for p in 1..max_len {
            let boundary = headers.iter().all(|line| {
                p < line.cells.len()
                    && line.cells[p].is_space()
                    && !line.cells[p - 1].is_space()
            });
            if boundary {
                self.widths.push(p);
            }
        }
    }

    /// Column cell spans for fixed-width mode.
    ///
    /// Column ends come from [`find_column_end`] (plus one, absorbing
    /// the boundary space); spans accumulate left to right and the last
    /// column extends to the end of the line.
    #[must_use]
    pub fn width_spans(&self, line: &LineC) -> Vec<Range<usize>> {
        let cells = &line.cells;
        let count = self.widths.len() + 1;
        let mut spans = Vec::with_capacity(count);
        let mut start = 0usize;
        for c in 0..count {
            let end = if c >= self.widths.len() {
                cells.len()
            } else {
                (find_column_end(cells, &self.widths, c) + 1).min(cells.len())
            };
            let end = end.max(start);
            spans.push(start..end);
            start = end;
        }
        spans
    }
}

/// Find where column `n` ends in a line, given the nominal boundary
/// positions `pos`.
///
/// The nominal boundary is trusted when it lands on a space. Otherwise
/// the data is misaligned (wide runes, long values) and the end is the
/// nearest space: first scanning right (but never into the next
/// column's territory), then left, but not past the previous boundary.
/// With no space to be found the column runs to the end of the line.
#[must_use]
pub fn find_column_end(cells: &[Cell], pos: &[usize], n: usize) -> usize {
    let Some(&nominal) = pos.get(n) else {
        return cells.len();
    };
    if nominal >= cells.len() {
        return cells.len();
    }
    if cells[nominal].is_space() {
        return nominal;
    }

    for i in nominal + 1..cells.len() {
        if cells[i].is_space() {
            if let Some(&next) = pos.get(n + 1) {
                if i >= next {
                    break;
                }
            }
            return i;
        }
    }

    let lower = if n > 0 { pos[n - 1] } else { 0 };
    for i in (lower + 1..nominal).rev() {
        if cells[i].is_space() {
            return i;
        }
    }
    cells.len()
}
