// ── Find / replace ────────────────────────────────────────────────────────────
//
// Pure-Rust search state for the find bar.  No UI imports; the engine talks to
// the active document only through `editor::DocumentHost`.

mod engine;
pub(crate) mod scan;

pub use engine::{FindSession, MatchSet, MatchStatus, ReplaceOutcome, SkipReason};

// ── Query ─────────────────────────────────────────────────────────────────────

/// Parameters for a single search.
///
/// Populated from the find bar and kept so that repeated "Find Next" presses
/// reuse it.  A query is compared by value: the engine throws its match list
/// away whenever the query changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub pattern: String,
    pub match_case: bool,
}

impl SearchQuery {
    pub fn new(pattern: impl Into<String>, match_case: bool) -> Self {
        Self {
            pattern: pattern.into(),
            match_case,
        }
    }

    /// Length of the pattern in characters, which is also the length of
    /// every match it produces.
    pub fn char_len(&self) -> usize {
        self.pattern.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

// ── Match ─────────────────────────────────────────────────────────────────────

/// One located occurrence of the pattern, in character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub len: usize,
}

impl Match {
    /// One past the last character of the match.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_len_counts_characters_not_bytes() {
        assert_eq!(SearchQuery::new("héllo", true).char_len(), 5);
        assert_eq!(SearchQuery::new("", false).char_len(), 0);
    }

    #[test]
    fn match_end() {
        let m = Match { offset: 4, len: 3 };
        assert_eq!(m.end(), 7);
    }
}
