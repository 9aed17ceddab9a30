//! The frame driver: one entry point per frame, plus the discrete
//! commands the input layer issues between frames.

use std::collections::HashMap;

use tracing::{debug, trace};

use strata_doc::{Document, PatternError, SearchOptions, Searcher};
use strata_style::StyleSet;

use crate::cancel::CancelToken;
use crate::overlay::{Painter, RenderLine};
use crate::plan::{ViewState, annotate_sections, move_up_rows, plan};
use crate::viewport::Viewport;

/// Lines built ahead of the viewport so scrolling stays warm.
const BUILD_SLACK: usize = 16;

/// A published frame: the row plan plus the painted lines it references.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// The resolved screen-row plan.
    pub viewport: Viewport,
    /// Painted lines keyed by logical line number.
    pub lines: HashMap<usize, RenderLine>,
}

/// The search-mode state machine relevant to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// No search interaction in progress.
    #[default]
    Idle,
    /// Incremental search: the pattern changes keystroke by keystroke
    /// and each change re-plans with the highlight applied.
    Incremental,
    /// The search was confirmed and the viewport snapped to the hit.
    Confirmed,
}

/// The pager core: document, scroll state, overlays, frame publication.
#[derive(Debug)]
pub struct Pager {
    doc: Document,
    styles: StyleSet,
    width: usize,
    height: usize,
    view: ViewState,
    column_cursor: Option<usize>,
    searcher: Option<Searcher>,
    search_state: SearchState,
    saved_top: Option<(usize, usize)>,
    published: Frame,
}

impl Pager {
    /// A pager over a document with the given screen geometry.
    #[must_use]
    pub fn new(doc: Document, width: usize, height: usize) -> Self {
        Self {
            doc,
            styles: StyleSet::default(),
            width,
            height,
            view: ViewState::default(),
            column_cursor: None,
            searcher: None,
            search_state: SearchState::Idle,
            saved_top: None,
            published: Frame::default(),
        }
    }

    /// The document (options, analyzers, built lines).
    #[must_use]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access for option commands.
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Overlay styles.
    pub fn styles_mut(&mut self) -> &mut StyleSet {
        &mut self.styles
    }

    /// The last complete frame.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.published
    }

    /// Current first body line.
    #[must_use]
    pub fn top_ln(&self) -> usize {
        self.view.top_ln
    }

    /// Current wrap offset / horizontal scroll.
    #[must_use]
    pub fn top_lx(&self) -> usize {
        self.view.top_lx
    }

    // --- input commands -------------------------------------------------

    /// Scroll to an absolute top line.
    pub fn set_top_ln(&mut self, ln: usize) {
        self.view.top_ln = ln;
    }

    /// Set the wrap offset / horizontal scroll.
    pub fn set_top_lx(&mut self, lx: usize) {
        self.view.top_lx = lx;
    }

    /// Jump to a line; the next frame clamps it clear of the sticky
    /// section header.
    pub fn goto_ln(&mut self, ln: usize) {
        self.view.top_ln = ln;
        self.view.top_lx = 0;
        self.view.show_goto = true;
    }

    /// Resize the screen.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Set the jump-target area from a spec string; returns whether the
    /// spec asked for section-relative jumps.
    pub fn set_jump_target(&mut self, spec: &str) -> bool {
        let (rows, section) = crate::jump::jump_position(self.height, spec);
        self.view.jump_target_height = rows.max(0) as usize;
        section
    }

    /// Highlight column `cursor` (column mode must be on to show it).
    pub fn set_column_cursor(&mut self, cursor: usize) {
        self.column_cursor = Some(cursor);
    }

    /// Drop the column highlight.
    pub fn clear_column_cursor(&mut self) {
        self.column_cursor = None;
    }

    /// Set the active search directly (the `n`/`N` flow).
    pub fn set_searcher(&mut self, pattern: &str, opts: SearchOptions) -> Result<(), PatternError> {
        self.searcher = Some(Searcher::new(pattern, opts)?);
        Ok(())
    }

    /// The active search, if any.
    #[must_use]
    pub fn searcher(&self) -> Option<&Searcher> {
        self.searcher.as_ref()
    }

    /// Current search interaction state.
    #[must_use]
    pub fn search_state(&self) -> SearchState {
        self.search_state
    }

    // --- search state machine -------------------------------------------

    /// Enter incremental search, remembering the pre-search position.
    pub fn begin_incremental_search(&mut self) {
        self.saved_top = Some((self.view.top_ln, self.view.top_lx));
        self.search_state = SearchState::Incremental;
    }

    /// Update the incremental pattern. The viewport snaps to the first
    /// hit at or below the pre-search position; a bad regex keeps the
    /// previous searcher.
    pub fn update_search(&mut self, pattern: &str, opts: SearchOptions) -> Result<(), PatternError> {
        let searcher = Searcher::new(pattern, opts)?;
        if self.search_state != SearchState::Incremental {
            self.begin_incremental_search();
        }
        let origin = self.saved_top.map_or(self.view.top_ln, |(ln, _)| ln);
        if let Some(hit) = self.find_from(&searcher, origin) {
            self.view.top_ln = hit;
            self.view.top_lx = 0;
        }
        self.searcher = Some(searcher);
        Ok(())
    }

    /// Confirm the search: snap to the hit line through goto clamping.
    pub fn confirm_search(&mut self) {
        if let Some(searcher) = self.searcher.take() {
            if let Some(hit) = self.find_from(&searcher, self.view.top_ln) {
                self.goto_ln(hit);
            }
            self.searcher = Some(searcher);
        }
        self.search_state = SearchState::Confirmed;
        self.saved_top = None;
    }

    /// Cancel the search, restoring the pre-search position.
    pub fn cancel_search(&mut self) {
        if let Some((ln, lx)) = self.saved_top.take() {
            self.view.top_ln = ln;
            self.view.top_lx = lx;
        }
        self.searcher = None;
        self.search_state = SearchState::Idle;
        debug!("search cancelled");
    }

    /// Jump to the next hit strictly below the current top.
    pub fn search_next(&mut self) {
        if let Some(searcher) = self.searcher.take() {
            if let Some(hit) = self.find_from(&searcher, self.view.top_ln + 1) {
                self.goto_ln(hit);
            }
            self.searcher = Some(searcher);
        }
    }

    /// Jump to the previous hit strictly above the current top.
    pub fn search_prev(&mut self) {
        if let Some(searcher) = self.searcher.take() {
            let hit = (0..self.view.top_ln)
                .rev()
                .find(|&ln| self.line_matches(&searcher, ln));
            if let Some(hit) = hit {
                self.goto_ln(hit);
            }
            self.searcher = Some(searcher);
        }
    }

    fn find_from(&self, searcher: &Searcher, from: usize) -> Option<usize> {
        (from..self.doc.lines_len()).find(|&ln| self.line_matches(searcher, ln))
    }

    fn line_matches(&self, searcher: &Searcher, ln: usize) -> bool {
        searcher.matches(&self.doc.line_c(ln).text)
    }

    // --- follow ----------------------------------------------------------

    /// React to appended input: follow the tail, or the latest section.
    pub fn on_append(&mut self) {
        let opts = self.doc.options().clone();
        if opts.follow_section && self.doc.section().has_pattern() {
            self.doc
                .section()
                .sync(self.doc.store(), self.doc.lines_len());
            let boundary = self.doc.section().last_boundary(opts.section_start_position);
            if let Some(boundary) = boundary {
                self.goto_ln(boundary.saturating_sub(opts.skip_lines + opts.header));
            }
        } else if opts.follow_mode {
            self.scroll_to_tail();
        }
    }

    /// Put the end of the document at the bottom of the screen.
    pub fn scroll_to_tail(&mut self) {
        let len = self.doc.lines_len();
        let fixed = self.published.viewport.header_height
            + self.published.viewport.section_header_height;
        let body_rows = self.height.saturating_sub(fixed).max(1);
        let bottom = move_up_rows(&self.doc, len, body_rows, self.width.max(1));
        let lead = self.doc.options().skip_lines + self.doc.options().header;
        self.view.top_ln = bottom.saturating_sub(lead);
        self.view.top_lx = 0;
    }

    // --- the frame -------------------------------------------------------

    /// Prepare one frame. Returns `true` when a new frame was published;
    /// a cancelled frame leaves the previous one in place.
    pub fn prepare_draw(&mut self, cancel: &CancelToken) -> bool {
        if cancel.is_cancelled() {
            trace!("frame cancelled before planning");
            return false;
        }
        let body_first = self.doc.body_first_ln(self.view.top_ln);
        self.doc
            .ensure_built(body_first..body_first + self.height + BUILD_SLACK);

        if cancel.is_cancelled() {
            return false;
        }
        let mut viewport = plan(&self.doc, &mut self.view, self.width, self.height);

        if cancel.is_cancelled() {
            return false;
        }
        annotate_sections(&self.doc, &mut viewport);

        if cancel.is_cancelled() {
            return false;
        }
        let mut lines: HashMap<usize, RenderLine> = HashMap::new();
        for row in &viewport.rows {
            let entry = lines
                .entry(row.ln)
                .or_insert_with(|| RenderLine::new(row.ln, self.doc.line_c(row.ln)));
            entry.is_header |= row.is_header;
            entry.is_section_header |= row.is_section_header;
            entry.is_body |= row.is_body();
        }

        if cancel.is_cancelled() {
            return false;
        }
        let painter = Painter::new(
            &self.doc,
            &self.styles,
            self.searcher.as_ref(),
            self.column_cursor,
        );
        for line in lines.values_mut() {
            painter.paint(line);
        }

        if cancel.is_cancelled() {
            trace!("frame cancelled before publication");
            return false;
        }
        self.published = Frame { viewport, lines };
        if self.search_state == SearchState::Confirmed {
            self.search_state = SearchState::Idle;
        }
        true
    }
}
