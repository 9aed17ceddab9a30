#![forbid(unsafe_code)]

//! Cell primitives and the line-content builder.
//!
//! A logical line enters as raw bytes and leaves as a [`LineC`]: a flat
//! escape-stripped, tab-expanded string plus a vector of styled [`Cell`]s
//! and a byte→cell position map tying the two together. The builder
//! drives the escape converter from `strata-ansi`, so styles land on
//! cells and escape bytes vanish.
//!
//! Width rules follow the terminal model: East-Asian-Wide runes and wide
//! emoji occupy two columns (a main cell plus a zero-width continuation
//! cell), combining marks attach to the preceding cell, tabs expand to
//! the next tab stop, and control runes render in caret notation.

pub mod cell;
pub mod line;
pub mod width;

pub use cell::Cell;
pub use line::{LineBuilder, LineC, PosMap};
pub use width::{char_display_width, str_display_width};
