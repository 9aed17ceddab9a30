#![forbid(unsafe_code)]

//! Viewport planning and frame preparation for the strata pager.
//!
//! One frame is prepared in a fixed sequence driven by [`Pager::prepare_draw`]:
//!
//! 1. build lines around the prospective viewport,
//! 2. plan the viewport (header rows, sticky section-header rows, body
//!    rows with wrapping, goto clamping),
//! 3. annotate every row with its section tag,
//! 4. run the overlay passes (alternate rows, multi-color words, header
//!    styles, column rainbow, search highlight, column cursor),
//! 5. publish the completed frame.
//!
//! A [`CancelToken`] is checked between steps; a cancelled frame leaves
//! the previously published frame on screen. The draw back-end consumes
//! the published [`Frame`] through the [`DrawBackend`] interface.

pub mod backend;
pub mod cancel;
pub mod frame;
pub mod jump;
pub mod overlay;
pub mod plan;
pub mod viewport;

pub use backend::{DrawBackend, draw_frame};
pub use cancel::CancelToken;
pub use frame::{Frame, Pager, SearchState};
pub use jump::{JumpSpecError, calculate_position, jump_position, range_ba};
pub use overlay::{Painter, RenderLine};
pub use plan::{ViewState, annotate_sections, plan};
pub use viewport::{LineRef, Viewport};
