//! End-to-end frame preparation against the fixture files: header and
//! section-header heights, goto clamping, and section numbering.

use strata_doc::Document;
use strata_view::{CancelToken, Pager, Viewport};

const SECTION_HEADER: &str = include_str!("data/section-header.txt");
const SECTION2: &str = include_str!("data/section2.txt");

struct Setup {
    wrap: bool,
    skip: usize,
    header: usize,
    section_header: bool,
    delimiter: &'static str,
    section_header_num: usize,
    section_start: isize,
    goto: bool,
    top_ln: usize,
    jump_target: &'static str,
}

impl Default for Setup {
    fn default() -> Self {
        Self {
            wrap: true,
            skip: 0,
            header: 3,
            section_header: true,
            delimiter: "^#",
            section_header_num: 3,
            section_start: 0,
            goto: false,
            top_ln: 10,
            jump_target: "",
        }
    }
}

fn prepared(content: &str, setup: &Setup) -> Pager {
    let mut doc = Document::from_str(content);
    if doc.options().wrap_mode != setup.wrap {
        doc.toggle_wrap_mode();
    }
    doc.set_skip_lines(setup.skip);
    doc.set_header(setup.header);
    doc.set_section_header(setup.section_header);
    doc.set_section_delimiter(setup.delimiter).unwrap();
    doc.set_section_header_num(setup.section_header_num);
    doc.set_section_start_position(setup.section_start);

    let mut pager = Pager::new(doc, 80, 24);
    if setup.goto {
        pager.goto_ln(setup.top_ln);
    } else {
        pager.set_top_ln(setup.top_ln);
    }
    pager.set_jump_target(setup.jump_target);
    assert!(pager.prepare_draw(&CancelToken::new()));
    pager
}

fn heights(pager: &Pager) -> (usize, usize, usize) {
    let vp = &pager.frame().viewport;
    (vp.header_height, vp.section_header_height, vp.top_ln)
}

#[test]
fn wrapped_header_and_section_header_heights() {
    let pager = prepared(SECTION_HEADER, &Setup::default());
    assert_eq!(heights(&pager), (5, 5, 10));
}

#[test]
fn unmatched_delimiter_disables_the_section_header() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            delimiter: "errordelimiter",
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 0, 10));
}

#[test]
fn unwrapped_heights_count_lines() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            wrap: false,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (3, 3, 10));
}

#[test]
fn goto_clamps_without_wrap() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            wrap: false,
            goto: true,
            top_ln: 3,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (3, 3, 0));
}

#[test]
fn goto_clamps_by_section_header_rows() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            goto: true,
            top_ln: 10,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 5, 5));
}

#[test]
fn goto_clamp_counts_wrapped_line_heights() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            goto: true,
            top_ln: 4,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 5, 1));
}

#[test]
fn goto_clamps_to_the_top_of_the_document() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            goto: true,
            top_ln: 2,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 5, 0));
}

#[test]
fn goto_without_section_header_is_untouched() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            section_header: false,
            goto: true,
            top_ln: 4,
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 0, 4));
}

#[test]
fn jump_target_area_suppresses_the_clamp() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            goto: true,
            top_ln: 3,
            jump_target: "5",
            ..Setup::default()
        },
    );
    assert_eq!(heights(&pager), (5, 5, 3));
}

#[test]
fn section_start_shifts_the_header_line() {
    let pager = prepared(
        SECTION_HEADER,
        &Setup {
            header: 0,
            section_start: 1,
            top_ln: 10,
            ..Setup::default()
        },
    );
    let vp = &pager.frame().viewport;
    assert_eq!(vp.header_height, 0);
    assert_eq!(vp.section_header_ln, Some(4));
    assert_eq!(vp.top_ln, 10);
}

#[test]
fn sticky_regions_never_exceed_the_screen() {
    let pager = prepared(SECTION_HEADER, &Setup::default());
    let vp = &pager.frame().viewport;
    assert!(vp.header_height + vp.section_header_height <= vp.height);
    assert!(vp.rows.len() <= vp.height);
}

#[test]
fn row_flags_partition_the_screen() {
    let pager = prepared(SECTION_HEADER, &Setup::default());
    let vp = &pager.frame().viewport;
    for (i, row) in vp.rows.iter().enumerate() {
        if i < vp.header_height {
            assert!(row.is_header, "row {i} should be a header row");
        } else if i < vp.header_height + vp.section_header_height {
            assert!(row.is_section_header, "row {i} should be a section row");
        } else {
            assert!(row.is_body(), "row {i} should be a body row");
        }
    }
}

fn section_string(vp: &Viewport) -> String {
    let mut out = String::from("|");
    for ln in vp.unique_lns() {
        let row = vp.rows.iter().find(|r| r.ln == ln).unwrap();
        out.push_str(&format!("({}){}-{:02}|", ln, row.section, row.section_nm));
    }
    out
}

#[test]
fn section_numbering_counts_within_sections() {
    let pager = prepared(
        SECTION2,
        &Setup {
            header: 0,
            delimiter: "^-",
            top_ln: 0,
            ..Setup::default()
        },
    );
    assert_eq!(
        section_string(&pager.frame().viewport),
        "|(0)0-01|(1)1-01|(2)1-02|(3)1-03|(4)1-04|(5)1-05|(6)1-06|(7)1-07\
         |(8)2-01|(9)2-02|(10)2-03|(11)2-04|(12)2-05|(13)2-06|(14)2-07\
         |(15)3-01|(16)3-02|(17)3-03|(18)3-04|(19)3-05|(20)3-06|(21)3-07\
         |(22)4-01|(23)4-02|"
    );
}

#[test]
fn section_numbering_with_positive_start_shift() {
    let pager = prepared(
        SECTION2,
        &Setup {
            header: 0,
            delimiter: "^-",
            section_start: 1,
            top_ln: 2,
            ..Setup::default()
        },
    );
    assert_eq!(
        section_string(&pager.frame().viewport),
        "|(2)1-01|(3)1-02|(4)1-03|(5)1-04|(6)1-05|(7)1-06|(8)1-07\
         |(9)2-01|(10)2-02|(11)2-03|(12)2-04|(13)2-05|(14)2-06|(15)2-07\
         |(16)3-01|(17)3-02|(18)3-03|(19)3-04|(20)3-05|(21)3-06|(22)3-07|"
    );
}

#[test]
fn section_numbering_with_negative_start_shift() {
    let pager = prepared(
        SECTION2,
        &Setup {
            header: 3,
            delimiter: "^-",
            section_start: -1,
            top_ln: 2,
            ..Setup::default()
        },
    );
    assert_eq!(
        section_string(&pager.frame().viewport),
        "|(0)1-01|(1)1-02|(2)1-03|(5)1-04|(6)1-05\
         |(7)2-01|(8)2-02|(9)2-03|(10)2-04|(11)2-05|(12)2-06|(13)2-07\
         |(14)3-01|(15)3-02|(16)3-03|(17)3-04|(18)3-05|(19)3-06|(20)3-07\
         |(21)4-01|(22)4-02|"
    );
}

#[test]
fn hide_other_section_stops_at_the_next_boundary() {
    let mut doc = Document::from_str(SECTION2);
    doc.set_header(0);
    doc.set_section_header(true);
    doc.set_section_delimiter("^-").unwrap();
    doc.toggle_hide_other_section();
    let mut pager = Pager::new(doc, 80, 24);
    pager.set_top_ln(2);
    assert!(pager.prepare_draw(&CancelToken::new()));
    let vp = &pager.frame().viewport;
    assert!(vp.rows.iter().all(|row| row.ln < 8));
    assert!(vp.rows.iter().any(|row| row.ln == 7));
}
