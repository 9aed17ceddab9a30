#![forbid(unsafe_code)]

//! Strata public facade crate.
//!
//! # Role in strata
//! This crate is the user-facing entry point for the pager core. It
//! re-exports the most commonly used types from the internal crates
//! (style/ansi/line/doc/view) so application code does not need to wire
//! each crate individually.
//!
//! # How it fits in the system
//! - Style model: provided by `strata-style`
//! - Escape interpretation: provided by `strata-ansi`
//! - Cells and built lines: provided by `strata-line`
//! - Document, analyzers, search: provided by `strata-doc`
//! - Viewport, overlays, frame driver: provided by `strata-view`
//!
//! The input layer, configuration loading, file I/O, and the terminal
//! back-end are host concerns: feed bytes into a [`LineStore`], issue
//! commands on a [`Pager`], and hand published frames to a
//! [`DrawBackend`] implementation.
//!
//! If you only depend on one crate in your application, it should be
//! `strata`.

use std::fmt;

// --- Style re-exports ------------------------------------------------------

pub use strata_style::{Color, Style, StyleFlags, StylePatch, StyleSet};

// --- Escape-sequence re-exports --------------------------------------------

pub use strata_ansi::{EscapeConverter, Pen, SgrCache, apply_sgr, parse_sgr, patch_to_sgr};

// --- Line re-exports -------------------------------------------------------

pub use strata_line::{Cell, LineBuilder, LineC, char_display_width, str_display_width};

// --- Document re-exports ---------------------------------------------------

pub use strata_doc::{
    ColumnIndex, DocOptions, Document, LineStore, PatternError, SearchOptions, Searcher,
    SectionIndex, StoreEvent, find_column_end,
};

// --- View re-exports -------------------------------------------------------

pub use strata_view::{
    CancelToken, DrawBackend, Frame, JumpSpecError, LineRef, Pager, Painter, RenderLine,
    SearchState, ViewState, Viewport, calculate_position, draw_frame, jump_position, range_ba,
};

// --- Errors ----------------------------------------------------------------

/// Top-level error type for strata hosts.
#[derive(Debug)]
pub enum Error {
    /// I/O failure while feeding the line store.
    Io(std::io::Error),
    /// A user-supplied pattern failed to compile.
    Pattern(PatternError),
    /// A jump or range spec failed to parse.
    JumpSpec(JumpSpecError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Pattern(err) => write!(f, "{err}"),
            Self::JumpSpec(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<PatternError> for Error {
    fn from(err: PatternError) -> Self {
        Self::Pattern(err)
    }
}

impl From<JumpSpecError> for Error {
    fn from(err: JumpSpecError) -> Self {
        Self::JumpSpec(err)
    }
}

/// Standard result type for strata APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude ---------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CancelToken, Cell, Color, DocOptions, Document, DrawBackend, Error, Frame, LineStore,
        Pager, Result, SearchOptions, Style, StyleSet, draw_frame,
    };

    pub use crate::{ansi, doc, line, style, view};
}

pub use strata_ansi as ansi;
pub use strata_doc as doc;
pub use strata_line as line;
pub use strata_style as style;
pub use strata_view as view;
