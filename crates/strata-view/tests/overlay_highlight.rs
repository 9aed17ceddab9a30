//! Overlay passes end to end: search, delimiter columns, fixed-width
//! columns, driven through full frame preparation.

use strata_doc::{Document, SearchOptions};
use strata_style::StyleFlags;
use strata_view::{CancelToken, Pager, RenderLine};

const SECTION_HEADER: &str = include_str!("data/section-header.txt");
const COLUMN: &str = include_str!("data/column.txt");
const PS: &str = include_str!("data/ps.txt");

fn bold(line: &RenderLine, index: usize) -> bool {
    line.cells[index].style.flags.contains(StyleFlags::BOLD)
}

fn delimiter_pager(cursor: usize) -> Pager {
    let mut doc = Document::from_str(COLUMN);
    doc.toggle_column_mode();
    doc.set_column_delimiter("|");
    let mut pager = Pager::new(doc, 80, 24);
    pager.set_column_cursor(cursor);
    assert!(pager.prepare_draw(&CancelToken::new()));
    pager
}

#[test]
fn delimiter_column_zero_starts_after_the_bar() {
    let pager = delimiter_pager(0);
    let line = &pager.frame().lines[&2];
    assert_eq!(line.source.text, "| 4     | 5     | 6     |");
    assert!(!bold(line, 0));
    assert!(bold(line, 1));
    assert!(bold(line, 7));
    assert!(!bold(line, 8));
}

#[test]
fn delimiter_column_one_covers_the_second_field() {
    let pager = delimiter_pager(1);
    let line = &pager.frame().lines[&2];
    assert!(!bold(line, 8));
    assert!(bold(line, 9));
    assert!(bold(line, 11));
    assert!(bold(line, 15));
    assert!(!bold(line, 16));
}

#[test]
fn delimiter_column_two_covers_the_third_field() {
    let pager = delimiter_pager(2);
    let line = &pager.frame().lines[&2];
    assert!(bold(line, 19));
    assert!(!bold(line, 24));
}

#[test]
fn delimiter_column_after_the_last_bar() {
    let pager = delimiter_pager(3);
    let line = &pager.frame().lines[&0];
    assert_eq!(line.source.text, "| test1 | test2 | test3 |a");
    assert!(!bold(line, 24));
    assert!(bold(line, 25));
}

fn width_pager(cursor: usize) -> Pager {
    let mut doc = Document::from_str(PS);
    doc.toggle_column_mode();
    doc.toggle_column_width_mode();
    doc.set_header(1);
    doc.set_column_widths();
    let mut pager = Pager::new(doc, 120, 24);
    pager.set_column_cursor(cursor);
    assert!(pager.prepare_draw(&CancelToken::new()));
    pager
}

#[test]
fn fixed_width_first_column() {
    let pager = width_pager(0);
    let line = &pager.frame().lines[&2];
    assert!(bold(line, 1));
    assert!(!bold(line, 5));
}

#[test]
fn fixed_width_command_column_starts_past_the_time_field() {
    let pager = width_pager(10);
    let line = &pager.frame().lines[&2];
    assert_eq!(&line.source.text[67..68], "[");
    assert!(!bold(line, 66));
    assert!(bold(line, 67));
    assert!(bold(line, line.cells.len() - 1));
}

#[test]
fn search_highlight_lands_on_the_hit_cells() {
    let mut doc = Document::from_str(SECTION_HEADER);
    doc.set_header(0);
    let mut pager = Pager::new(doc, 80, 24);
    pager
        .set_searcher("dy", SearchOptions::default())
        .unwrap();
    assert!(pager.prepare_draw(&CancelToken::new()));
    let line = &pager.frame().lines[&6];
    assert_eq!(line.source.text, "body 1");
    let reversed = |i: usize| line.cells[i].style.flags.contains(StyleFlags::REVERSE);
    assert!(!reversed(1));
    assert!(reversed(2));
    assert!(reversed(3));
    assert!(!reversed(4));
}
