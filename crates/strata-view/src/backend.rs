//! The draw back-end interface.
//!
//! The core stops at a published [`Frame`]; putting styled cells on a
//! real terminal is the host's job. [`draw_frame`] walks a frame in row
//! order and drives the four primitives every back-end must provide.

use strata_line::Cell;
use strata_style::Style;

use crate::frame::Frame;

/// What a terminal back-end must implement to display frames.
pub trait DrawBackend {
    /// Write one styled cell at `(row, col)`. Wide cells cover the
    /// following column; the continuation cell is not sent.
    fn put_cell(&mut self, row: usize, col: usize, cell: &Cell);

    /// Clear from `(row, col)` to the end of the row with a style.
    fn clear_to_eol(&mut self, row: usize, col: usize, style: &Style);

    /// Show the cursor at a position, or hide it.
    fn set_cursor(&mut self, position: Option<(usize, usize)>);

    /// Flush the frame to the screen.
    fn sync(&mut self);
}

/// Draw a published frame: cells row by row, each row's tail cleared
/// with the line's end-of-line style, leftover screen rows blanked.
pub fn draw_frame(frame: &Frame, backend: &mut impl DrawBackend) {
    let vp = &frame.viewport;
    for (row_idx, row) in vp.rows.iter().enumerate() {
        let Some(line) = frame.lines.get(&row.ln) else {
            backend.clear_to_eol(row_idx, 0, &Style::default());
            continue;
        };
        let mut col = 0usize;
        for cell in line.cells.iter().skip(row.offset) {
            let w = cell.width as usize;
            if w == 0 {
                continue;
            }
            if col + w > vp.width {
                break;
            }
            backend.put_cell(row_idx, col, cell);
            col += w;
        }
        backend.clear_to_eol(row_idx, col, &line.source.eol_style);
    }
    for row_idx in vp.rows.len()..vp.height {
        backend.clear_to_eol(row_idx, 0, &Style::default());
    }
    backend.sync();
}
