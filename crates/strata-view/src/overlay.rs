//! Overlay passes: styles painted on top of already-built cells.
//!
//! The painter works on a frame-local copy of a line's cells; the
//! memoized [`strata_line::LineC`] underneath is never mutated. Passes
//! run in a fixed order (alternate rows, multi-color words, header /
//! section-header styles, column rainbow, search highlight, column
//! cursor), so the later passes win where they overlap.

use std::ops::Range;
use std::sync::Arc;

use strata_doc::{Document, Searcher};
use strata_line::{Cell, LineC};
use strata_style::{StylePatch, StyleSet};

/// A line as it will be drawn: shared source plus a paintable cell copy.
#[derive(Debug, Clone)]
pub struct RenderLine {
    /// Logical line number.
    pub ln: usize,
    /// The built line (text, position map, end-of-line style).
    pub source: Arc<LineC>,
    /// The cells, cloned for this frame's overlays.
    pub cells: Vec<Cell>,
    /// Whether any row shows this line as part of the fixed header.
    pub is_header: bool,
    /// Whether any row shows this line as part of the section header.
    pub is_section_header: bool,
    /// Whether any row shows this line as body content.
    pub is_body: bool,
}

impl RenderLine {
    /// Snapshot a built line for painting.
    #[must_use]
    pub fn new(ln: usize, source: Arc<LineC>) -> Self {
        let cells = source.cells.clone();
        Self {
            ln,
            source,
            cells,
            is_header: false,
            is_section_header: false,
            is_body: false,
        }
    }

    fn apply(&mut self, range: Range<usize>, patch: &StylePatch) {
        let end = range.end.min(self.cells.len());
        for cell in &mut self.cells[range.start.min(end)..end] {
            cell.style = cell.style.apply(patch);
        }
    }

    fn apply_all(&mut self, patch: &StylePatch) {
        self.apply(0..self.cells.len(), patch);
    }
}

/// Applies the overlay passes for one frame.
#[derive(Debug)]
pub struct Painter<'a> {
    doc: &'a Document,
    styles: &'a StyleSet,
    searcher: Option<&'a Searcher>,
    column_cursor: Option<usize>,
}

impl<'a> Painter<'a> {
    /// A painter for the current frame's inputs.
    #[must_use]
    pub fn new(
        doc: &'a Document,
        styles: &'a StyleSet,
        searcher: Option<&'a Searcher>,
        column_cursor: Option<usize>,
    ) -> Self {
        Self {
            doc,
            styles,
            searcher,
            column_cursor,
        }
    }

    /// Run every enabled pass over one line.
    pub fn paint(&self, line: &mut RenderLine) {
        let opts = self.doc.options();

        if opts.alternate_rows && line.is_body && line.ln % 2 == 1 {
            line.apply_all(&self.styles.alternate);
        }

        if !self.doc.multi_color_words().is_empty() {
            self.paint_multi_color(line);
        }

        if line.is_header {
            line.apply_all(&self.styles.header);
        }
        if line.is_section_header {
            line.apply_all(&self.styles.section_header);
        }

        if opts.column_mode && opts.column_rainbow {
            self.paint_column_rainbow(line);
        }

        if line.is_body {
            if let Some(searcher) = self.searcher {
                self.paint_search(line, searcher);
            }
        }

        if opts.column_mode {
            if let Some(cursor) = self.column_cursor {
                self.paint_column_cursor(line, cursor);
            }
        }
    }

    fn paint_multi_color(&self, line: &mut RenderLine) {
        let rotation = &self.styles.rotation;
        if rotation.is_empty() {
            return;
        }
        let spans: Vec<(Range<usize>, usize)> = self
            .doc
            .multi_color_words()
            .iter()
            .enumerate()
            .flat_map(|(i, re)| {
                re.find_iter(&line.source.text)
                    .map(move |m| (m.range(), i))
                    .collect::<Vec<_>>()
            })
            .collect();
        for (bytes, i) in spans {
            let cells = line.source.pos.cell_range(bytes);
            line.apply(cells, &rotation[i % rotation.len()]);
        }
    }

    fn column_spans(&self, line: &RenderLine) -> Vec<Range<usize>> {
        if self.doc.options().column_width_mode {
            self.doc.columns().width_spans(&line.source)
        } else {
            self.doc.columns().delimited_spans(&line.source)
        }
    }

    fn paint_column_rainbow(&self, line: &mut RenderLine) {
        let rotation = &self.styles.rotation;
        if rotation.is_empty() {
            return;
        }
        for (k, span) in self.column_spans(line).into_iter().enumerate() {
            line.apply(span, &rotation[k % rotation.len()]);
        }
    }

    fn paint_column_cursor(&self, line: &mut RenderLine, cursor: usize) {
        if let Some(span) = self.column_spans(line).into_iter().nth(cursor) {
            line.apply(span, &self.styles.column_highlight);
        }
    }

    fn paint_search(&self, line: &mut RenderLine, searcher: &Searcher) {
        for bytes in searcher.highlight_spans(&line.source.text) {
            let cells = line.source.pos.cell_range(bytes);
            line.apply(cells, &self.styles.search_highlight);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_doc::SearchOptions;
    use strata_style::StyleFlags;

    fn render(doc: &Document, ln: usize) -> RenderLine {
        let mut line = RenderLine::new(ln, doc.line_c(ln));
        line.is_body = true;
        line
    }

    #[test]
    fn search_pass_reverses_hit_cells() {
        let doc = Document::from_str("body 1\n");
        let styles = StyleSet::default();
        let searcher = Searcher::new("dy", SearchOptions::default()).unwrap();
        let painter = Painter::new(&doc, &styles, Some(&searcher), None);
        let mut line = render(&doc, 0);
        painter.paint(&mut line);
        assert!(!line.cells[1].style.flags.contains(StyleFlags::REVERSE));
        assert!(line.cells[2].style.flags.contains(StyleFlags::REVERSE));
        assert!(line.cells[3].style.flags.contains(StyleFlags::REVERSE));
        assert!(!line.cells[4].style.flags.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn alternate_rows_style_odd_body_lines() {
        let mut doc = Document::from_str("even\nodd\n");
        doc.toggle_alternate_rows();
        let styles = StyleSet::default();
        let painter = Painter::new(&doc, &styles, None, None);

        let mut even = render(&doc, 0);
        painter.paint(&mut even);
        assert!(!even.cells[0].style.flags.contains(StyleFlags::DIM));

        let mut odd = render(&doc, 1);
        painter.paint(&mut odd);
        assert!(odd.cells[0].style.flags.contains(StyleFlags::DIM));
    }

    #[test]
    fn header_rows_are_not_search_highlighted() {
        let doc = Document::from_str("needle\n");
        let styles = StyleSet::default();
        let searcher = Searcher::new("needle", SearchOptions::default()).unwrap();
        let painter = Painter::new(&doc, &styles, Some(&searcher), None);
        let mut line = RenderLine::new(0, doc.line_c(0));
        line.is_header = true;
        painter.paint(&mut line);
        assert!(!line.cells[0].style.flags.contains(StyleFlags::REVERSE));
        assert!(line.cells[0].style.flags.contains(StyleFlags::BOLD));
    }

    #[test]
    fn multi_color_words_rotate_colors() {
        let mut doc = Document::from_str("alpha beta\n");
        doc.set_multi_color_words(&["alpha".into(), "beta".into()])
            .unwrap();
        let styles = StyleSet::default();
        let painter = Painter::new(&doc, &styles, None, None);
        let mut line = render(&doc, 0);
        painter.paint(&mut line);
        let first = styles.rotation[0].fg;
        let second = styles.rotation[1].fg;
        assert_eq!(line.cells[0].style.fg, first);
        assert_eq!(line.cells[6].style.fg, second);
        assert_eq!(line.cells[5].style.fg, None);
    }

    #[test]
    fn column_cursor_highlights_one_column() {
        let mut doc = Document::from_str("a|b|c\n");
        doc.toggle_column_mode();
        doc.set_column_delimiter("|");
        let styles = StyleSet::default();
        let painter = Painter::new(&doc, &styles, None, Some(1));
        let mut line = render(&doc, 0);
        painter.paint(&mut line);
        assert!(!line.cells[0].style.flags.contains(StyleFlags::BOLD));
        assert!(line.cells[2].style.flags.contains(StyleFlags::BOLD));
        assert!(!line.cells[4].style.flags.contains(StyleFlags::BOLD));
    }

    #[test]
    fn search_wins_over_alternate_rows() {
        let mut doc = Document::from_str("zero\nfind me\n");
        doc.toggle_alternate_rows();
        let styles = StyleSet::default();
        let searcher = Searcher::new("find", SearchOptions::default()).unwrap();
        let painter = Painter::new(&doc, &styles, Some(&searcher), None);
        let mut line = render(&doc, 1);
        painter.paint(&mut line);
        let hit = &line.cells[0].style;
        assert!(hit.flags.contains(StyleFlags::REVERSE));
        assert!(hit.flags.contains(StyleFlags::DIM));
    }
}
