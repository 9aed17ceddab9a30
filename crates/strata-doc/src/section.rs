//! Section boundaries by delimiter regex.
//!
//! The index scans the raw line store lazily: `sync` extends the scan
//! watermark and records the line numbers that match the delimiter.
//! Callers ask boundary questions with a `shift` (the configured section
//! start position): line `ln` is a *boundary* when line `ln - shift`
//! matches the delimiter.

use parking_lot::Mutex;
use regex::Regex;
use tracing::debug;

use crate::pattern::{PatternError, compile_regex};
use crate::store::LineStore;

#[derive(Debug, Default)]
struct ScanState {
    /// Line numbers whose text matches the delimiter, ascending.
    matches: Vec<usize>,
    /// Lines `[0, scanned)` have been tested.
    scanned: usize,
}

/// Lazily-extended index of section delimiter matches.
#[derive(Debug, Default)]
pub struct SectionIndex {
    pattern: Option<Regex>,
    state: Mutex<ScanState>,
}

impl SectionIndex {
    /// An index with no pattern: nothing is ever a boundary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the delimiter pattern.
    ///
    /// On a compile error the previous pattern (and its scan state) is
    /// kept and the error is returned.
    pub fn set_pattern(&mut self, pattern: &str) -> Result<(), PatternError> {
        if pattern.is_empty() {
            self.pattern = None;
            *self.state.get_mut() = ScanState::default();
            return Ok(());
        }
        match compile_regex(pattern) {
            Ok(re) => {
                self.pattern = Some(re);
                *self.state.get_mut() = ScanState::default();
                Ok(())
            }
            Err(err) => {
                debug!(pattern, "section delimiter failed to compile");
                Err(err)
            }
        }
    }

    /// Whether a delimiter pattern is set.
    #[must_use]
    pub fn has_pattern(&self) -> bool {
        self.pattern.is_some()
    }

    /// Extend the scan so lines `[0, upto)` are covered.
    ///
    /// A store that shrank since the last sync triggers a rescan.
    pub fn sync(&self, store: &LineStore, upto: usize) {
        let Some(re) = &self.pattern else {
            return;
        };
        let len = store.len();
        let upto = upto.min(len);
        let mut state = self.state.lock();
        if state.scanned > len {
            *state = ScanState::default();
        }
        while state.scanned < upto {
            let ln = state.scanned;
            let matched = store
                .with_line(ln, |bytes, _| re.is_match(&String::from_utf8_lossy(bytes)))
                .unwrap_or(false);
            if matched {
                state.matches.push(ln);
            }
            state.scanned += 1;
        }
    }

    /// Whether line `ln` is a section boundary under `shift`.
    ///
    /// Callers must have synced past `ln - shift`.
    #[must_use]
    pub fn is_boundary(&self, ln: usize, shift: isize) -> bool {
        let target = ln as isize - shift;
        if target < 0 {
            return false;
        }
        let state = self.state.lock();
        state.matches.binary_search(&(target as usize)).is_ok()
    }

    /// The greatest boundary line ≤ `ln` under `shift`, if any.
    ///
    /// Boundaries shifted below line 0 are ignored.
    #[must_use]
    pub fn last_boundary_at_or_before(&self, ln: usize, shift: isize) -> Option<usize> {
        let state = self.state.lock();
        state
            .matches
            .iter()
            .rev()
            .filter_map(|&m| {
                let boundary = m as isize + shift;
                (boundary >= 0).then_some(boundary as usize)
            })
            .find(|&boundary| boundary <= ln)
    }

    /// The latest boundary in the scanned range (follow-section target).
    #[must_use]
    pub fn last_boundary(&self, shift: isize) -> Option<usize> {
        let state = self.state.lock();
        state.matches.iter().rev().find_map(|&m| {
            let boundary = m as isize + shift;
            (boundary >= 0).then_some(boundary as usize)
        })
    }

    /// Whether any line in the scanned range matched.
    #[must_use]
    pub fn any_match(&self) -> bool {
        !self.state.lock().matches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(content: &str, pattern: &str) -> (LineStore, SectionIndex) {
        let store = LineStore::from_str(content);
        let mut index = SectionIndex::new();
        index.set_pattern(pattern).unwrap();
        let len = store.len();
        index.sync(&store, len);
        (store, index)
    }

    #[test]
    fn matches_are_boundaries_at_shift_zero() {
        let (_, index) = indexed("plain\n# one\nbody\n# two\n", "^#");
        assert!(!index.is_boundary(0, 0));
        assert!(index.is_boundary(1, 0));
        assert!(!index.is_boundary(2, 0));
        assert!(index.is_boundary(3, 0));
    }

    #[test]
    fn positive_shift_moves_boundaries_down() {
        let (_, index) = indexed("plain\n# one\nbody\n", "^#");
        assert!(!index.is_boundary(1, 1));
        assert!(index.is_boundary(2, 1));
    }

    #[test]
    fn negative_shift_moves_boundaries_up() {
        let (_, index) = indexed("plain\n# one\nbody\n", "^#");
        assert!(index.is_boundary(0, -1));
        assert!(!index.is_boundary(1, -1));
    }

    #[test]
    fn shifted_below_zero_is_ignored() {
        let (_, index) = indexed("# zero\nbody\n", "^#");
        assert!(!index.is_boundary(0, 1));
        assert_eq!(index.last_boundary_at_or_before(0, -1), None);
    }

    #[test]
    fn last_boundary_at_or_before_picks_the_nearest() {
        let (_, index) = indexed("x\n# a\nx\nx\n# b\nx\n", "^#");
        assert_eq!(index.last_boundary_at_or_before(0, 0), None);
        assert_eq!(index.last_boundary_at_or_before(3, 0), Some(1));
        assert_eq!(index.last_boundary_at_or_before(4, 0), Some(4));
        assert_eq!(index.last_boundary_at_or_before(99, 0), Some(4));
    }

    #[test]
    fn no_pattern_means_no_boundaries() {
        let store = LineStore::from_str("# a\n");
        let index = SectionIndex::new();
        index.sync(&store, 1);
        assert!(!index.is_boundary(0, 0));
        assert!(!index.any_match());
    }

    #[test]
    fn bad_pattern_keeps_previous() {
        let store = LineStore::from_str("# a\nb\n");
        let mut index = SectionIndex::new();
        index.set_pattern("^#").unwrap();
        assert!(index.set_pattern("[").is_err());
        index.sync(&store, 2);
        assert!(index.is_boundary(0, 0));
    }

    #[test]
    fn sync_is_incremental() {
        let store = LineStore::from_str("# a\nb\n# c\n");
        let mut index = SectionIndex::new();
        index.set_pattern("^#").unwrap();
        index.sync(&store, 1);
        assert!(index.is_boundary(0, 0));
        assert!(!index.is_boundary(2, 0));
        index.sync(&store, 3);
        assert!(index.is_boundary(2, 0));
    }

    #[test]
    fn truncated_store_rescans() {
        let store = LineStore::from_str("a\n# b\nc\n");
        let mut index = SectionIndex::new();
        index.set_pattern("^#").unwrap();
        index.sync(&store, 3);
        assert!(index.is_boundary(1, 0));
        store.truncate(1);
        index.sync(&store, 1);
        assert!(!index.is_boundary(1, 0));
    }
}
