//! SGR (Set Graphics Rendition) parameter parsing.
//!
//! An SGR parameter string (the bytes between `CSI` and the final `m`)
//! parses into a [`StylePatch`]. Parsed patches are memoized in an
//! [`SgrCache`] keyed by the raw parameter string, so the common case of
//! a log file repeating the same few sequences costs one hash lookup per
//! occurrence.
//!
//! Extended colors support three spellings:
//!
//! ```text
//! 38;5;n     38;2;r;g;b      semicolon separated
//! 38:5:n     38:2:r:g:b      colon separated
//!            38:2::r:g:b     colon separated, empty colorspace id
//! ```
//!
//! In the semicolon form the color parameters are consumed from the outer
//! parameter list; in the colon form they are the colon tail of a single
//! element and the outer index does not advance.
//!
//! A parameter that fails to parse as a number makes the whole string a
//! no-op patch; a garbled sequence must not restyle the line.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use strata_style::{Color, Style, StyleFlags, StylePatch};

/// 256-color palette introducer (`5` in `38;5;n`).
const COLORS_256: i64 = 5;
/// RGB introducer (`2` in `38;2;r;g;b`).
const COLORS_RGB: i64 = 2;

/// Shared memo of raw SGR parameter strings to parsed patches.
///
/// Scoped to a document (each document owns one and hands clones to its
/// line builders) rather than process-global, so documents with divergent
/// content do not share an unbounded map.
#[derive(Debug, Clone, Default)]
pub struct SgrCache {
    map: Arc<Mutex<HashMap<String, StylePatch>>>,
}

impl SgrCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parameter string, parsing and inserting on miss.
    #[must_use]
    pub fn get_or_parse(&self, params: &str) -> StylePatch {
        let mut map = self.map.lock();
        if let Some(patch) = map.get(params) {
            return patch.clone();
        }
        let patch = parse_sgr(params);
        map.insert(params.to_string(), patch.clone());
        patch
    }

    /// Number of memoized parameter strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.lock().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.lock().is_empty()
    }
}

/// Apply an SGR parameter string to a resolved style.
///
/// `""`, `"0"`, and `";"` short-circuit to the default style (full
/// reset); everything else parses into a patch (via the cache) and merges
/// onto `style`.
#[must_use]
pub fn apply_sgr(style: &Style, params: &str, cache: &SgrCache) -> Style {
    match params {
        "" | "0" | ";" => Style::default(),
        _ => style.apply(&cache.get_or_parse(params)),
    }
}

/// One SGR element split into its code and color sub-parameters.
struct SgrParams<'a> {
    code: i64,
    params: Vec<&'a str>,
    colon: bool,
}

/// Split element `index` of the parameter list into code + parameters.
///
/// With a colon separator the tail of the same element supplies the
/// parameters; otherwise, for the extended-color codes, the following
/// outer elements do.
fn to_sgr_code<'a>(list: &[&'a str], index: usize) -> Option<SgrParams<'a>> {
    let element = list[index];
    let mut colon_parts = element.split(':');
    let code = sgr_number(colon_parts.next().unwrap_or(""))?;

    let tail: Vec<&str> = colon_parts.collect();
    if !tail.is_empty() {
        return Some(SgrParams {
            code,
            params: tail,
            colon: true,
        });
    }
    if matches!(code, 38 | 48 | 58) && list.len() > index + 1 {
        return Some(SgrParams {
            code,
            params: list[index + 1..].to_vec(),
            colon: false,
        });
    }
    Some(SgrParams {
        code,
        params: Vec::new(),
        colon: false,
    })
}

/// Parse a parameter as a number. Empty means 0; any non-digit is an
/// error.
fn sgr_number(s: &str) -> Option<i64> {
    if s.is_empty() {
        return Some(0);
    }
    if s.bytes().any(|b| !b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse an extended color, returning the color (if any) and how many
/// outer parameters were consumed. The colon form consumes none.
fn parse_sgr_color(sgr: &SgrParams<'_>) -> Result<(Option<Color>, usize), ()> {
    let (color, inc) = convert_sgr_color(sgr)?;
    Ok((color, if sgr.colon { 0 } else { inc }))
}

fn convert_sgr_color(sgr: &SgrParams<'_>) -> Result<(Option<Color>, usize), ()> {
    if sgr.params.is_empty() {
        return Ok((None, 0));
    }
    let mut inc = 1;
    let introducer = sgr_number(sgr.params[0]).ok_or(())?;
    match introducer {
        COLORS_256 => {
            if sgr.params.len() < 2 {
                return Ok((None, inc));
            }
            let param = sgr.params[1];
            let color = if param.is_empty() {
                None
            } else {
                Color::palette(sgr_number(param).ok_or(())?)
            };
            inc += 1;
            Ok((color, inc))
        }
        COLORS_RGB => {
            if sgr.params.len() < 4 {
                return Ok((None, sgr.params.len()));
            }
            // The colon form allows an empty colorspace id before the
            // channels: 38:2::r:g:b.
            let rgb = if sgr.colon && sgr.params[1].is_empty() && sgr.params.len() > 4 {
                &sgr.params[2..5]
            } else {
                &sgr.params[1..4]
            };
            let color = parse_rgb_color(rgb[0], rgb[1], rgb[2])?;
            inc += 3;
            Ok((color, inc))
        }
        _ => Ok((None, inc)),
    }
}

/// Parse RGB channels. Empty components or out-of-range values carry no
/// color; non-digits are an error.
fn parse_rgb_color(red: &str, green: &str, blue: &str) -> Result<Option<Color>, ()> {
    if red.is_empty() || green.is_empty() || blue.is_empty() {
        return Ok(None);
    }
    let r = sgr_number(red).ok_or(())?;
    let g = sgr_number(green).ok_or(())?;
    let b = sgr_number(blue).ok_or(())?;
    Ok(Color::rgb(r, g, b))
}

/// Underline sub-parameter (`4:n`): only `4:0` is underline-off, every
/// other value renders as plain underline.
fn underline_style(patch: &mut StylePatch, param: &str) {
    let Some(n) = sgr_number(param) else {
        return;
    };
    if n == 0 {
        patch.disable(StyleFlags::UNDERLINE);
    } else {
        patch.enable(StyleFlags::UNDERLINE);
    }
}

/// Parse an SGR parameter string into a style patch.
///
/// An invalid number anywhere (outside code 58, which keeps the partial
/// patch) collapses the whole string to a no-op patch.
#[must_use]
pub fn parse_sgr(params: &str) -> StylePatch {
    let mut patch = StylePatch::default();
    let list: Vec<&str> = params.split(';').collect();
    let mut index = 0;
    while index < list.len() {
        let Some(sgr) = to_sgr_code(&list, index) else {
            return StylePatch::default();
        };
        match sgr.code {
            0 => patch = StylePatch::default(),
            1 => patch.enable(StyleFlags::BOLD),
            2 => patch.enable(StyleFlags::DIM),
            3 => patch.enable(StyleFlags::ITALIC),
            4 => match sgr.params.first() {
                Some(param) if !param.is_empty() => underline_style(&mut patch, param),
                _ => patch.enable(StyleFlags::UNDERLINE),
            },
            // Rapid blink renders the same as blink.
            5 | 6 => patch.enable(StyleFlags::BLINK),
            7 => patch.enable(StyleFlags::REVERSE),
            8 | 28 => {} // conceal is not rendered
            9 => patch.enable(StyleFlags::STRIKETHROUGH),
            // Double underline renders the same as underline.
            21 => patch.enable(StyleFlags::UNDERLINE),
            22 => patch.disable(StyleFlags::BOLD),
            23 => patch.disable(StyleFlags::ITALIC),
            24 => patch.disable(StyleFlags::UNDERLINE),
            25 => patch.disable(StyleFlags::BLINK),
            27 => patch.disable(StyleFlags::REVERSE),
            29 => patch.disable(StyleFlags::STRIKETHROUGH),
            30..=37 => patch.fg = Color::palette(sgr.code - 30),
            38 => {
                let Ok((color, inc)) = parse_sgr_color(&sgr) else {
                    return StylePatch::default();
                };
                index += inc;
                patch.fg = color;
            }
            39 => patch.fg = Some(Color::Default),
            40..=47 => patch.bg = Color::palette(sgr.code - 40),
            48 => {
                let Ok((color, inc)) = parse_sgr_color(&sgr) else {
                    return StylePatch::default();
                };
                index += inc;
                patch.bg = color;
            }
            49 => patch.bg = Some(Color::Default),
            53 => patch.set |= StyleFlags::OVERLINE,
            55 => patch.clear |= StyleFlags::OVERLINE,
            58 => {
                // Underline color: parsed only to advance the index.
                let Ok((_, inc)) = parse_sgr_color(&sgr) else {
                    return patch;
                };
                index += inc;
            }
            59 => {}       // underline color default: not rendered
            73..=75 => {}  // vertical alignment: not rendered
            90..=97 => patch.fg = Color::palette(sgr.code - 82),
            100..=107 => patch.bg = Color::palette(sgr.code - 92),
            _ => {}
        }
        index += 1;
    }
    patch
}

/// Serialize a patch back to an SGR parameter string.
///
/// Off-codes are emitted before on-codes so that re-parsing reproduces
/// the patch bit-for-bit: `parse_sgr(patch_to_sgr(parse_sgr(s)))` equals
/// `parse_sgr(s)` for every input `s`.
#[must_use]
pub fn patch_to_sgr(patch: &StylePatch) -> String {
    const OFF: &[(StyleFlags, &str)] = &[
        (StyleFlags::BOLD, "22"),
        (StyleFlags::DIM, "22"),
        (StyleFlags::ITALIC, "23"),
        (StyleFlags::UNDERLINE, "24"),
        (StyleFlags::BLINK, "25"),
        (StyleFlags::REVERSE, "27"),
        (StyleFlags::STRIKETHROUGH, "29"),
        (StyleFlags::OVERLINE, "55"),
    ];
    const ON: &[(StyleFlags, &str)] = &[
        (StyleFlags::BOLD, "1"),
        (StyleFlags::DIM, "2"),
        (StyleFlags::ITALIC, "3"),
        (StyleFlags::UNDERLINE, "4"),
        (StyleFlags::BLINK, "5"),
        (StyleFlags::REVERSE, "7"),
        (StyleFlags::STRIKETHROUGH, "9"),
        (StyleFlags::OVERLINE, "53"),
    ];

    let mut codes: Vec<String> = Vec::new();
    for &(flag, code) in OFF {
        if patch.clear.contains(flag) {
            codes.push(code.to_string());
        }
    }
    codes.dedup();
    for &(flag, code) in ON {
        if patch.set.contains(flag) {
            codes.push(code.to_string());
        }
    }
    if let Some(color) = patch.fg {
        codes.push(color_to_sgr(color, 38, 39));
    }
    if let Some(color) = patch.bg {
        codes.push(color_to_sgr(color, 48, 49));
    }
    codes.join(";")
}

fn color_to_sgr(color: Color, extended: u8, default: u8) -> String {
    match color {
        Color::Default => default.to_string(),
        Color::Palette(n) => format!("{extended};5;{n}"),
        Color::Rgb(r, g, b) => format!("{extended};2;{r};{g};{b}"),
    }
}
