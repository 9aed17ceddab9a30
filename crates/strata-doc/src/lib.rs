#![forbid(unsafe_code)]

//! Document model for the strata pager.
//!
//! This crate owns everything between raw bytes and the viewport:
//!
//! - [`LineStore`]: the append-only raw line store, shared between the
//!   UI thread and reader tasks that may still be feeding it.
//! - [`Document`]: the facade owning the display options, the memoized
//!   built lines, and the analyzers.
//! - [`SectionIndex`]: section boundaries by delimiter regex.
//! - [`ColumnIndex`]: column boundaries by delimiter regex or by
//!   fixed-width inference over the header rows.
//! - [`Searcher`]: literal and regex search with case and smart-case
//!   handling.
//!
//! Pattern failures never panic and never lose state: a setter that
//! receives a bad pattern reports [`PatternError`] and keeps the
//! previously compiled pattern.

pub mod column;
pub mod document;
pub mod pattern;
pub mod search;
pub mod section;
pub mod store;

pub use column::{ColumnIndex, find_column_end};
pub use document::{DocOptions, Document};
pub use pattern::PatternError;
pub use search::{SearchOptions, Searcher};
pub use section::SectionIndex;
pub use store::{LineStore, StoreEvent};
