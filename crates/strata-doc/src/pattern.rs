//! Pattern compilation helpers shared by the analyzers and the searcher.

use regex::Regex;
use thiserror::Error;

/// A user-supplied pattern failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern {pattern:?}: {source}")]
pub struct PatternError {
    /// The pattern as the user typed it.
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: &str, source: regex::Error) -> Self {
        Self {
            pattern: pattern.to_string(),
            source,
        }
    }
}

/// Whether a string contains any regex metacharacter.
#[must_use]
pub(crate) fn has_meta(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|c| matches!(c, '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'))
}

/// Compile a pattern, auto-quoting plain strings.
///
/// Strings without regex metacharacters are escaped and matched
/// literally. Strings with metacharacters compile as regexes, unless
/// the compiled regex is degenerate (fails to compile, or matches the
/// empty string the way a bare `|` does), in which case the string falls
/// back to a literal match. The result always compiles.
#[must_use]
pub(crate) fn compile_auto(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    if has_meta(pattern) {
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match("") {
                return Some(re);
            }
        }
    }
    Regex::new(&regex::escape(pattern)).ok()
}

/// Compile a pattern as a regex, no quoting.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::new(pattern, source))
}
