//! The document facade: options, memoized built lines, analyzers.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use strata_ansi::SgrCache;
use strata_line::{LineBuilder, LineC};

use crate::column::ColumnIndex;
use crate::pattern::{PatternError, compile_regex};
use crate::section::SectionIndex;
use crate::store::LineStore;

/// Display options owned by a document.
///
/// Everything here is reachable through a discrete input command in the
/// surrounding layer; the core only reads them while planning a frame.
#[derive(Debug, Clone)]
pub struct DocOptions {
    /// Tab stop width.
    pub tab_width: usize,
    /// Wrap long lines instead of horizontal scrolling.
    pub wrap_mode: bool,
    /// Lines skipped before the header region.
    pub skip_lines: usize,
    /// Number of fixed header lines.
    pub header: usize,
    /// Show sticky section-header rows.
    pub section_header: bool,
    /// Number of lines in a sticky section header.
    pub section_header_num: usize,
    /// Shift between a delimiter match and the section start.
    pub section_start_position: isize,
    /// Column highlighting enabled.
    pub column_mode: bool,
    /// Columns by fixed widths instead of delimiter.
    pub column_width_mode: bool,
    /// Rotate a color per column.
    pub column_rainbow: bool,
    /// Style odd body lines.
    pub alternate_rows: bool,
    /// Drop original SGR styling while building cells.
    pub plain_mode: bool,
    /// Display line numbers (rendered by the backend gutter).
    pub line_num_mode: bool,
    /// Follow appended output.
    pub follow_mode: bool,
    /// Follow the latest section instead of the tail.
    pub follow_section: bool,
    /// Show only the current section's body.
    pub hide_other_section: bool,
}

impl Default for DocOptions {
    fn default() -> Self {
        Self {
            tab_width: 8,
            wrap_mode: true,
            skip_lines: 0,
            header: 0,
            section_header: false,
            section_header_num: 3,
            section_start_position: 0,
            column_mode: false,
            column_width_mode: false,
            column_rainbow: false,
            alternate_rows: false,
            plain_mode: false,
            line_num_mode: false,
            follow_mode: false,
            follow_section: false,
            hide_other_section: false,
        }
    }
}

#[derive(Debug, Default)]
struct LineCache {
    epoch: u64,
    store_generation: u64,
    map: HashMap<usize, Arc<LineC>>,
}

/// The document: raw store + options + analyzers + built-line memo.
#[derive(Debug)]
pub struct Document {
    store: Arc<LineStore>,
    opts: DocOptions,
    sgr_cache: SgrCache,
    cache: Mutex<LineCache>,
    /// Bumped by any option change that alters built cells.
    style_epoch: u64,
    section: SectionIndex,
    columns: ColumnIndex,
    multi_color: Vec<Regex>,
    empty: Arc<LineC>,
}

impl Document {
    /// Wrap a store with default options.
    #[must_use]
    pub fn new(store: Arc<LineStore>) -> Self {
        Self {
            store,
            opts: DocOptions::default(),
            sgr_cache: SgrCache::new(),
            cache: Mutex::new(LineCache::default()),
            style_epoch: 0,
            section: SectionIndex::new(),
            columns: ColumnIndex::new(),
            multi_color: Vec::new(),
            empty: Arc::new(LineC::empty()),
        }
    }

    /// Convenience: a document over fully-buffered text.
    #[must_use]
    pub fn from_str(content: &str) -> Self {
        Self::new(Arc::new(LineStore::from_str(content)))
    }

    /// The shared raw line store.
    #[must_use]
    pub fn store(&self) -> &Arc<LineStore> {
        &self.store
    }

    /// Current display options.
    #[must_use]
    pub fn options(&self) -> &DocOptions {
        &self.opts
    }

    /// Number of raw lines.
    #[must_use]
    pub fn lines_len(&self) -> usize {
        self.store.len()
    }

    /// The first body line for a given top position: the body starts
    /// after the skipped region and the fixed header.
    #[must_use]
    pub fn body_first_ln(&self, top_ln: usize) -> usize {
        top_ln + self.opts.skip_lines + self.opts.header
    }

    /// The built line for `ln`. Out-of-range line numbers yield the
    /// empty line; incomplete tail lines are built but not memoized.
    #[must_use]
    pub fn line_c(&self, ln: usize) -> Arc<LineC> {
        let mut cache = self.cache.lock();
        let generation = self.store.generation();
        if cache.epoch != self.style_epoch || cache.store_generation != generation {
            cache.map.clear();
            cache.epoch = self.style_epoch;
            cache.store_generation = generation;
        }
        if let Some(line) = cache.map.get(&ln) {
            return Arc::clone(line);
        }
        let builder = LineBuilder::new(self.sgr_cache.clone())
            .tab_width(self.opts.tab_width)
            .plain(self.opts.plain_mode);
        let built = self
            .store
            .with_line(ln, |bytes, complete| builder.build(bytes, complete));
        match built {
            Some(line) => {
                let line = Arc::new(line);
                if line.valid {
                    cache.map.insert(ln, Arc::clone(&line));
                }
                line
            }
            None => Arc::clone(&self.empty),
        }
    }

    /// Build lines ahead of the viewport so the planner never blocks on
    /// a cold cache mid-frame.
    pub fn ensure_built(&self, range: std::ops::Range<usize>) {
        let end = range.end.min(self.lines_len());
        for ln in range.start..end {
            let _ = self.line_c(ln);
        }
    }

    /// Section boundary index.
    #[must_use]
    pub fn section(&self) -> &SectionIndex {
        &self.section
    }

    /// Column boundary index.
    #[must_use]
    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    /// Multi-color word patterns, in rotation order.
    #[must_use]
    pub fn multi_color_words(&self) -> &[Regex] {
        &self.multi_color
    }

    /// Replace the options wholesale (frame setup in tests).
    pub fn set_options(&mut self, opts: DocOptions) {
        let style_changed =
            opts.tab_width != self.opts.tab_width || opts.plain_mode != self.opts.plain_mode;
        self.opts = opts;
        if style_changed {
            self.bump_epoch();
        }
    }

    /// Set the tab stop width.
    pub fn set_tab_width(&mut self, width: usize) {
        if self.opts.tab_width != width.max(1) {
            self.opts.tab_width = width.max(1);
            self.bump_epoch();
        }
    }

    /// Toggle plain mode (strip original styling).
    pub fn toggle_plain_mode(&mut self) {
        self.opts.plain_mode = !self.opts.plain_mode;
        self.bump_epoch();
    }

    /// Toggle wrap mode.
    pub fn toggle_wrap_mode(&mut self) {
        self.opts.wrap_mode = !self.opts.wrap_mode;
    }

    /// Toggle column highlighting.
    pub fn toggle_column_mode(&mut self) {
        self.opts.column_mode = !self.opts.column_mode;
    }

    /// Toggle fixed-width column detection.
    pub fn toggle_column_width_mode(&mut self) {
        self.opts.column_width_mode = !self.opts.column_width_mode;
    }

    /// Toggle the per-column color rotation.
    pub fn toggle_column_rainbow(&mut self) {
        self.opts.column_rainbow = !self.opts.column_rainbow;
    }

    /// Toggle alternate-row styling.
    pub fn toggle_alternate_rows(&mut self) {
        self.opts.alternate_rows = !self.opts.alternate_rows;
    }

    /// Toggle the line-number gutter.
    pub fn toggle_line_num_mode(&mut self) {
        self.opts.line_num_mode = !self.opts.line_num_mode;
    }

    /// Toggle follow mode.
    pub fn toggle_follow_mode(&mut self) {
        self.opts.follow_mode = !self.opts.follow_mode;
    }

    /// Toggle follow-section mode.
    pub fn toggle_follow_section(&mut self) {
        self.opts.follow_section = !self.opts.follow_section;
    }

    /// Toggle hiding of sections other than the current one.
    pub fn toggle_hide_other_section(&mut self) {
        self.opts.hide_other_section = !self.opts.hide_other_section;
    }

    /// Number of fixed header lines.
    pub fn set_header(&mut self, header: usize) {
        self.opts.header = header;
    }

    /// Lines skipped before the header.
    pub fn set_skip_lines(&mut self, skip: usize) {
        self.opts.skip_lines = skip;
    }

    /// Enable or disable sticky section headers.
    pub fn set_section_header(&mut self, on: bool) {
        self.opts.section_header = on;
    }

    /// Number of lines in a sticky section header.
    pub fn set_section_header_num(&mut self, num: usize) {
        self.opts.section_header_num = num;
    }

    /// Shift between a delimiter match and the section start.
    pub fn set_section_start_position(&mut self, shift: isize) {
        self.opts.section_start_position = shift;
    }

    /// Set the section delimiter regex.
    ///
    /// On error the previous pattern stays active.
    pub fn set_section_delimiter(&mut self, pattern: &str) -> Result<(), PatternError> {
        self.section.set_pattern(pattern)
    }

    /// Set the column delimiter (auto-quoted; never fails).
    pub fn set_column_delimiter(&mut self, pattern: &str) {
        self.columns.set_delimiter(pattern);
    }

    /// Set the multi-color word patterns (each one a regex).
    ///
    /// All patterns must compile; on error the previous set is kept.
    pub fn set_multi_color_words(&mut self, words: &[String]) -> Result<(), PatternError> {
        let mut compiled = Vec::with_capacity(words.len());
        for word in words {
            if word.is_empty() {
                continue;
            }
            match compile_regex(word) {
                Ok(re) => compiled.push(re),
                Err(err) => {
                    debug!(word, "multi-color word failed to compile");
                    return Err(err);
                }
            }
        }
        self.multi_color = compiled;
        Ok(())
    }

    /// Infer fixed-width column boundaries from the current header
    /// region (at least one line, starting after the skipped region).
    pub fn set_column_widths(&mut self) {
        let start = self.opts.skip_lines;
        let count = self.opts.header.max(1);
        let headers: Vec<Arc<LineC>> = (start..start + count)
            .filter(|&ln| ln < self.lines_len())
            .map(|ln| self.line_c(ln))
            .collect();
        self.columns.infer_widths(&headers);
    }

    fn bump_epoch(&mut self) {
        self.style_epoch += 1;
    }
}
