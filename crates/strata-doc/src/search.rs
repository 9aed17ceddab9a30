//! Line search: literal and regex, case and smart-case aware.

use std::ops::Range;

use regex::Regex;

use crate::pattern::{PatternError, compile_regex};

/// How a search pattern is interpreted.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions {
    /// Interpret the pattern as a regex instead of a literal.
    pub regex: bool,
    /// Case-sensitive matching.
    pub case_sensitive: bool,
    /// Smart case: case-sensitive only when the pattern contains an
    /// uppercase rune. Overrides `case_sensitive` when set.
    pub smart_case: bool,
    /// Invert: lines (and spans) *without* a match are the hits.
    pub non_match: bool,
}

/// A compiled search.
///
/// Literal patterns are escaped and compiled to a regex as well, so
/// byte offsets are correct under Unicode case folding.
#[derive(Debug, Clone)]
pub struct Searcher {
    pattern: String,
    re: Option<Regex>,
    non_match: bool,
}

impl Searcher {
    /// Compile a search. An empty pattern matches nothing.
    pub fn new(pattern: &str, opts: SearchOptions) -> Result<Self, PatternError> {
        let re = if pattern.is_empty() {
            None
        } else {
            let sensitive = if opts.smart_case {
                pattern.chars().any(char::is_uppercase)
            } else {
                opts.case_sensitive
            };
            let body = if opts.regex {
                pattern.to_string()
            } else {
                regex::escape(pattern)
            };
            let source = if sensitive {
                body
            } else {
                format!("(?i){body}")
            };
            Some(compile_regex(&source).map_err(|err| PatternError {
                pattern: pattern.to_string(),
                source: err.source,
            })?)
        };
        Ok(Self {
            pattern: pattern.to_string(),
            re,
            non_match: opts.non_match,
        })
    }

    /// The pattern as the user typed it.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether this search is inverted.
    #[must_use]
    pub fn is_non_match(&self) -> bool {
        self.non_match
    }

    /// All match byte ranges in a line, left to right, overlaps merged.
    #[must_use]
    pub fn find_spans(&self, text: &str) -> Vec<Range<usize>> {
        let Some(re) = &self.re else {
            return Vec::new();
        };
        let mut spans: Vec<Range<usize>> = Vec::new();
        for m in re.find_iter(text) {
            if m.range().is_empty() {
                continue;
            }
            match spans.last_mut() {
                Some(last) if m.start() <= last.end => last.end = last.end.max(m.end()),
                _ => spans.push(m.range()),
            }
        }
        spans
    }

    /// Spans to highlight, honoring inversion: for a non-match search
    /// the complement of the hits within `[0, text.len())`.
    #[must_use]
    pub fn highlight_spans(&self, text: &str) -> Vec<Range<usize>> {
        let spans = self.find_spans(text);
        if !self.non_match {
            return spans;
        }
        let mut inverted = Vec::new();
        let mut cursor = 0;
        for span in &spans {
            if span.start > cursor {
                inverted.push(cursor..span.start);
            }
            cursor = span.end;
        }
        if cursor < text.len() {
            inverted.push(cursor..text.len());
        }
        inverted
    }

    /// Whether a line is a hit (inverted searches hit on non-matching
    /// lines).
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let Some(re) = &self.re else {
            return false;
        };
        re.is_match(text) != self.non_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(pattern: &str) -> Searcher {
        Searcher::new(pattern, SearchOptions::default()).unwrap()
    }

    #[test]
    fn literal_finds_all_occurrences() {
        let s = literal("dy");
        assert_eq!(s.find_spans("body 1 dy"), vec![2..4, 7..9]);
    }

    #[test]
    fn literal_is_case_insensitive_by_default() {
        let s = literal("error");
        assert!(s.matches("ERROR: disk full"));
    }

    #[test]
    fn case_sensitive_option() {
        let s = Searcher::new(
            "Error",
            SearchOptions {
                case_sensitive: true,
                ..SearchOptions::default()
            },
        )
        .unwrap();
        assert!(s.matches("Error"));
        assert!(!s.matches("error"));
    }

    #[test]
    fn smart_case_follows_the_pattern() {
        let lower = Searcher::new(
            "warn",
            SearchOptions {
                smart_case: true,
                ..SearchOptions::default()
            },
        )
        .unwrap();
        assert!(lower.matches("WARN"));

        let upper = Searcher::new(
            "Warn",
            SearchOptions {
                smart_case: true,
                ..SearchOptions::default()
            },
        )
        .unwrap();
        assert!(upper.matches("Warn"));
        assert!(!upper.matches("warn"));
    }

    #[test]
    fn literal_pattern_metacharacters_are_quoted() {
        let s = literal("a.b");
        assert!(s.matches("a.b"));
        assert!(!s.matches("axb"));
    }

    #[test]
    fn regex_mode() {
        let s = Searcher::new(
            r"\d{3}",
            SearchOptions {
                regex: true,
                case_sensitive: true,
                ..SearchOptions::default()
            },
        )
        .unwrap();
        assert_eq!(s.find_spans("ab 123 45 678"), vec![3..6, 10..13]);
    }

    #[test]
    fn bad_regex_reports_the_original_pattern() {
        let err = Searcher::new(
            "(",
            SearchOptions {
                regex: true,
                ..SearchOptions::default()
            },
        )
        .unwrap_err();
        assert_eq!(err.pattern, "(");
    }

    #[test]
    fn empty_pattern_matches_nothing() {
        let s = literal("");
        assert!(!s.matches("anything"));
        assert!(s.find_spans("anything").is_empty());
    }

    #[test]
    fn adjacent_matches_stay_merged() {
        let s = literal("aa");
        assert_eq!(s.find_spans("aaaa"), vec![0..4]);
    }

    #[test]
    fn non_match_inverts_lines_and_spans() {
        let s = Searcher::new(
            "x",
            SearchOptions {
                non_match: true,
                ..SearchOptions::default()
            },
        )
        .unwrap();
        assert!(s.matches("no hit here"));
        assert!(!s.matches("xx"));
        assert_eq!(s.highlight_spans("axb"), vec![0..1, 2..3]);
        assert_eq!(s.highlight_spans("ab"), vec![0..2]);
    }

    #[test]
    fn unicode_case_folding_keeps_offsets_valid() {
        let s = literal("straße");
        let text = "STRASSE Straße";
        for span in s.find_spans(text) {
            assert!(text.is_char_boundary(span.start));
            assert!(text.is_char_boundary(span.end));
        }
    }
}
