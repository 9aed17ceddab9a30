#![forbid(unsafe_code)]

//! Style model for the strata pager.
//!
//! Two kinds of values live here:
//!
//! - [`Style`]: the *resolved* style carried by every display cell:
//!   attribute flags plus foreground/background colors and an optional
//!   OSC 8 hyperlink.
//! - [`StylePatch`]: a *delta* against a resolved style. SGR sequences
//!   parse into patches, and the overlay passes (search highlight, column
//!   cursor, alternate rows, ...) are configured as patches. Applying a
//!   patch clears its off-bits, sets its on-bits, and replaces any color
//!   it carries; an absent color inherits.
//!
//! Colors follow the terminal hierarchy: default → 256 palette → 24-bit
//! RGB. `Option<Color>` encodes inheritance: `None` means "leave the
//! previous value", `Some(Color::Default)` means the terminal default.

pub mod color;
pub mod style;

pub use color::Color;
pub use style::{Style, StylePatch, StyleFlags, StyleSet};
