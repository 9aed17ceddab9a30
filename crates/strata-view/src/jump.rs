//! Jump-target and position specs.
//!
//! The movement layer accepts positions in several spellings: a plain
//! row count (`"5"`), a fraction of the screen (`".3"`), a percentage
//! (`"20%"`), a negative count measured from the bottom (`"-10"`), and
//! a leading `s` for section-relative jumps. A before/after range spec
//! (`"3:1"`) sizes context around a jump target.

use thiserror::Error;

/// A malformed before/after range spec.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid range spec {spec:?}")]
pub struct JumpSpecError {
    /// The spec as the user typed it.
    pub spec: String,
}

/// Resolve a position spec against a screen height, in rows.
///
/// `"n"` is absolute, `".f"` is a fraction of the height, `"n%"` a
/// percentage. Unparsable specs resolve to 0.
#[must_use]
pub fn calculate_position(height: usize, spec: &str) -> f64 {
    if spec.is_empty() {
        return 0.0;
    }
    if let Some(percent) = spec.strip_suffix('%') {
        return percent
            .parse::<f64>()
            .map_or(0.0, |p| p / 100.0 * height as f64);
    }
    if spec.starts_with('.') {
        return spec.parse::<f64>().map_or(0.0, |f| f * height as f64);
    }
    spec.parse::<f64>().unwrap_or(0.0)
}

/// Resolve a jump-target spec: `(rows, section)`.
///
/// A leading `s`/`S` marks a section jump; negative values measure from
/// the bottom of the screen.
#[must_use]
pub fn jump_position(height: usize, spec: &str) -> (isize, bool) {
    let spec = spec.trim();
    if spec.is_empty() {
        return (0, false);
    }
    if let Some(rest) = spec.strip_prefix(&['s', 'S'][..]) {
        return (calculate_position(height, rest).round() as isize, true);
    }
    let n = calculate_position(height, spec).round() as isize;
    if n < 0 {
        return (height as isize - 1 + n, false);
    }
    (n, false)
}

/// Parse a `before:after` range spec. Either side may be omitted.
pub fn range_ba(spec: &str) -> Result<(isize, isize), JumpSpecError> {
    let err = || JumpSpecError {
        spec: spec.to_string(),
    };
    let parse = |part: &str| -> Result<isize, JumpSpecError> {
        if part.is_empty() {
            Ok(0)
        } else {
            part.parse().map_err(|_| err())
        }
    };
    match spec.split_once(':') {
        Some((before, after)) => Ok((parse(before)?, parse(after)?)),
        None => Ok((parse(spec)?, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_absolute() {
        assert_eq!(calculate_position(30, "1"), 1.0);
    }

    #[test]
    fn position_fraction() {
        assert_eq!(calculate_position(30, ".5"), 15.0);
    }

    #[test]
    fn position_percent() {
        assert_eq!(calculate_position(30, "20%"), 6.0);
        assert_eq!(calculate_position(45, "30%"), 13.5);
    }

    #[test]
    fn position_invalid_is_zero() {
        assert_eq!(calculate_position(30, "invalid"), 0.0);
        assert_eq!(calculate_position(30, "p%"), 0.0);
        assert_eq!(calculate_position(30, ".i"), 0.0);
    }

    #[test]
    fn jump_absolute_and_fraction() {
        assert_eq!(jump_position(30, "1"), (1, false));
        assert_eq!(jump_position(10, ".3"), (3, false));
    }

    #[test]
    fn jump_negative_measures_from_bottom() {
        assert_eq!(jump_position(30, "-10"), (19, false));
    }

    #[test]
    fn jump_invalid_is_zero() {
        assert_eq!(jump_position(30, "invalid"), (0, false));
        assert_eq!(jump_position(30, ".i"), (0, false));
        assert_eq!(jump_position(30, "p%"), (0, false));
    }

    #[test]
    fn jump_section_prefix() {
        assert_eq!(jump_position(30, "s"), (0, true));
        assert_eq!(jump_position(30, "s5"), (5, true));
    }

    #[test]
    fn range_before_only() {
        assert_eq!(range_ba("1").unwrap(), (1, 0));
        assert_eq!(range_ba("1:").unwrap(), (1, 0));
    }

    #[test]
    fn range_both_and_after_only() {
        assert_eq!(range_ba("1:1").unwrap(), (1, 1));
        assert_eq!(range_ba(":1").unwrap(), (0, 1));
    }

    #[test]
    fn range_invalid() {
        assert!(range_ba("invalid").is_err());
        assert!(range_ba("1:invalid").is_err());
    }
}
