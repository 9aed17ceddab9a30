//! The viewport planner.
//!
//! Turns the document options plus the scroll state into the screen-row
//! plan for one frame: fixed header rows first, then the sticky section
//! header, then body rows expanding wraps from `(top_ln, top_lx)`.

use std::collections::HashMap;

use strata_doc::Document;
use strata_line::LineC;

use crate::viewport::{LineRef, Viewport};

/// Scroll state owned by the frame driver and adjusted by the planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewState {
    /// First body line, relative to the region below skip + header.
    pub top_ln: usize,
    /// Wrap offset (or horizontal scroll) within the first body line.
    pub top_lx: usize,
    /// Set right after a jump; the planner clamps `top_ln` so the jump
    /// target is not hidden under the sticky section header.
    pub show_goto: bool,
    /// Rows reserved for the jump-target display; non-zero suppresses
    /// goto clamping.
    pub jump_target_height: usize,
}

/// Starting cell index of each wrapped screen row of a line.
///
/// Always at least one chunk; wide cells never straddle a boundary.
#[must_use]
pub fn wrap_offsets(line: &LineC, width: usize) -> Vec<usize> {
    let width = width.max(1);
    let mut offsets = vec![0];
    let mut col = 0usize;
    for (i, cell) in line.cells.iter().enumerate() {
        let w = cell.width as usize;
        if w == 0 {
            continue;
        }
        if col + w > width && col > 0 {
            offsets.push(i);
            col = 0;
        }
        col += w;
    }
    offsets
}

/// Screen rows occupied by one line under the current wrap mode.
fn line_rows(doc: &Document, ln: usize, width: usize) -> usize {
    if doc.options().wrap_mode {
        wrap_offsets(&doc.line_c(ln), width).len()
    } else {
        1
    }
}

/// Total screen rows for a line range.
fn region_rows(doc: &Document, lns: std::ops::Range<usize>, width: usize) -> usize {
    lns.map(|ln| line_rows(doc, ln, width)).sum()
}

/// Move up from `from` until the consumed lines cover `rows` screen
/// rows, clamping at line 0. Used by goto clamping and tail following.
#[must_use]
pub(crate) fn move_up_rows(doc: &Document, from: usize, rows: usize, width: usize) -> usize {
    let mut remaining = rows as isize;
    let mut ln = from;
    while remaining > 0 && ln > 0 {
        ln -= 1;
        remaining -= line_rows(doc, ln, width) as isize;
    }
    ln
}

/// Plan the viewport for one frame. May adjust `view` (truncation
/// clamp, goto clamp, wrap-offset normalization).
#[must_use]
pub fn plan(doc: &Document, view: &mut ViewState, width: usize, height: usize) -> Viewport {
    let opts = doc.options().clone();
    let width = width.max(1);
    let mut vp = Viewport {
        width,
        height,
        ..Viewport::default()
    };
    let len = doc.lines_len();
    if len == 0 || height == 0 {
        view.top_ln = 0;
        return vp;
    }

    // A store that shrank under us: clamp back into range.
    view.top_ln = view.top_ln.min(len - 1);

    let header_start = opts.skip_lines.min(len);
    let header_end = (opts.skip_lines + opts.header).min(len);
    vp.header_height = if opts.wrap_mode {
        region_rows(doc, header_start..header_end, width)
    } else {
        header_end - header_start
    };

    let shift = opts.section_start_position;
    let scan_upto = doc
        .body_first_ln(view.top_ln)
        .saturating_add(height)
        .saturating_add(shift.unsigned_abs() + 1)
        .min(len);
    doc.section().sync(doc.store(), scan_upto);

    if opts.section_header && doc.section().has_pattern() {
        let body_first = doc.body_first_ln(view.top_ln);
        if let Some(boundary) = doc.section().last_boundary_at_or_before(body_first, shift) {
            vp.section_header_ln = Some(boundary);
            let end = (boundary + opts.section_header_num).min(len);
            vp.section_header_height = if opts.wrap_mode {
                region_rows(doc, boundary..end, width)
            } else {
                end - boundary
            };
        }
    }

    // The sticky regions never eat the whole screen.
    vp.header_height = vp.header_height.min(height);
    vp.section_header_height = vp.section_header_height.min(height - vp.header_height);

    if view.show_goto {
        view.show_goto = false;
        if view.jump_target_height == 0 && vp.section_header_height > 0 {
            let clamped = move_up_rows(doc, view.top_ln, vp.section_header_height, width);
            if clamped != view.top_ln {
                tracing::trace!(from = view.top_ln, to = clamped, "goto clamped");
                view.top_ln = clamped;
                view.top_lx = 0;
            }
        }
    }
    vp.top_ln = view.top_ln;

    let body_first = doc.body_first_ln(view.top_ln);

    // Snap the wrap offset onto a chunk boundary of the first body line.
    if opts.wrap_mode {
        if body_first < len {
            let offsets = wrap_offsets(&doc.line_c(body_first), width);
            view.top_lx = offsets
                .iter()
                .rev()
                .find(|&&o| o <= view.top_lx)
                .copied()
                .unwrap_or(0);
        } else {
            view.top_lx = 0;
        }
    }
    vp.top_lx = view.top_lx;
    let hscroll = if opts.wrap_mode { 0 } else { view.top_lx };

    for ln in header_start..header_end {
        emit_line(&mut vp, doc, ln, width, &opts, 0, hscroll, RowKind::Header);
    }
    if let Some(boundary) = vp.section_header_ln {
        let end = (boundary + opts.section_header_num).min(len);
        for ln in boundary..end {
            emit_line(&mut vp, doc, ln, width, &opts, 0, hscroll, RowKind::SectionHeader);
        }
    }

    let mut ln = body_first;
    let mut first = true;
    while vp.rows.len() < height && ln < len {
        if opts.hide_other_section
            && vp.section_header_ln.is_some()
            && ln > body_first
            && doc.section().is_boundary(ln, shift)
        {
            break;
        }
        let from = if first && opts.wrap_mode { view.top_lx } else { 0 };
        emit_line(&mut vp, doc, ln, width, &opts, from, hscroll, RowKind::Body);
        first = false;
        ln += 1;
    }

    vp
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    SectionHeader,
    Body,
}

fn emit_line(
    vp: &mut Viewport,
    doc: &Document,
    ln: usize,
    width: usize,
    opts: &strata_doc::DocOptions,
    from_offset: usize,
    hscroll: usize,
    kind: RowKind,
) {
    let offsets = if opts.wrap_mode {
        wrap_offsets(&doc.line_c(ln), width)
    } else {
        vec![hscroll]
    };
    for offset in offsets {
        if opts.wrap_mode && offset < from_offset {
            continue;
        }
        if vp.rows.len() >= vp.height {
            return;
        }
        let mut row = LineRef::new(ln, offset);
        row.is_header = kind == RowKind::Header;
        row.is_section_header = kind == RowKind::SectionHeader;
        vp.rows.push(row);
    }
}

/// Annotate every emitted row with its `(section, section_nm)` tag.
///
/// Counters run over the window's unique lines in ascending order: a
/// boundary line starts the next section at number 1, every other line
/// increments the number. Lines before the first visible boundary get
/// section 0 with numbers counting from 1.
pub fn annotate_sections(doc: &Document, vp: &mut Viewport) {
    let shift = doc.options().section_start_position;
    let has_pattern = doc.section().has_pattern();
    let mut tags: HashMap<usize, (usize, usize)> = HashMap::new();
    let mut section = 0usize;
    let mut nm = 0usize;
    for ln in vp.unique_lns() {
        if has_pattern && doc.section().is_boundary(ln, shift) {
            section += 1;
            nm = 1;
        } else {
            nm += 1;
        }
        tags.insert(ln, (section, nm));
    }
    for row in &mut vp.rows {
        if let Some(&(section, nm)) = tags.get(&row.ln) {
            row.section = section;
            row.section_nm = nm;
        }
    }
}
