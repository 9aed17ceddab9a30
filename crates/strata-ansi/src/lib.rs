#![forbid(unsafe_code)]

//! ANSI escape-sequence interpretation for the strata pager.
//!
//! The pager never forwards raw escape bytes to the screen. Instead, each
//! line's bytes run through [`EscapeConverter`], a per-line state machine
//! that consumes CSI/SGR/OSC sequences and mutates the current [`Pen`]
//! (working style + end-of-line style). Runes the converter does not
//! consume become display cells styled with the pen at that moment.
//!
//! Covered sequences:
//!
//! - SGR (`CSI ... m`): attributes, 16/256/RGB colors in both semicolon
//!   and colon parameter spellings.
//! - EL (`CSI K` / `CSI 0 K`): carries the current background into the
//!   end-of-line style so cleared tails keep their color.
//! - Cursor movement finals (`A`..`T`): consumed and ignored; a pager
//!   renders content, it does not replay cursor motion.
//! - OSC 8 hyperlinks (id parameter + URI, BEL or ST terminated).
//! - DCS/SOS/PM/APC substrings and charset designations: consumed.
//!
//! Anything unsupported degrades to "no style change"; nothing here
//! errors out of a line.

pub mod convert;
pub mod sgr;

pub use convert::{EscapeConverter, Pen};
pub use sgr::{SgrCache, apply_sgr, parse_sgr, patch_to_sgr};
