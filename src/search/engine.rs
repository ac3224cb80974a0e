// ── Find session ──────────────────────────────────────────────────────────────
//
// One `FindSession` lives as long as the find bar.  It owns the query, the
// match list and the cursor; it never owns document text.  The match list is
// computed lazily: every change notification simply drops it, and the next
// navigation or replace call decides whether a rescan is needed.

use std::fmt;

use super::{scan, Match, SearchQuery};
use crate::editor::{DocumentHost, TextStamp};

// ── Match set ─────────────────────────────────────────────────────────────────

/// All matches of one query against one text snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet {
    stamp: TextStamp,
    offsets: Vec<usize>,
    len: usize,
}

impl MatchSet {
    /// Scan `text` for the query's pattern.
    pub fn compute(query: &SearchQuery, text: &str, stamp: TextStamp) -> Self {
        Self {
            stamp,
            offsets: scan::find_all(query, text),
            len: query.char_len(),
        }
    }

    /// Ascending start offsets.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Match> {
        self.offsets.get(index).map(|&offset| Match {
            offset,
            len: self.len,
        })
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why a replace did nothing.  None of these are failures; the UI uses them
/// to decide whether to show a "no matches" hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The search box is empty.
    EmptyPattern,
    /// No tab is open.
    NoActiveDocument,
    /// Nothing is selected as the current match (no search yet, no hits, or
    /// the list was invalidated by an edit).
    NoCurrentMatch,
    /// The buffer changed under the current match; nothing was replaced.
    StaleMatch,
}

/// Result of replacing the current match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The match at `offset` was replaced; `match_count` matches remain.
    Replaced { offset: usize, match_count: usize },
    Skipped(SkipReason),
}

/// "2 of 5" indicator for the find bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchStatus {
    /// Zero-based index of the current match, if any.
    pub current: Option<usize>,
    pub total: usize,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.current, self.total) {
            (_, 0) => f.write_str("No matches"),
            (Some(i), total) => write!(f, "{} of {total}", i + 1),
            (None, 1) => f.write_str("1 match"),
            (None, total) => write!(f, "{total} matches"),
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Find/replace state for one editing view.
#[derive(Debug, Default)]
pub struct FindSession {
    query: SearchQuery,
    /// `None` until computed, and again after any invalidation.
    matches: Option<MatchSet>,
    /// Index into `matches`; always in bounds when set.
    cursor: Option<usize>,
}

impl FindSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn matches(&self) -> Option<&MatchSet> {
        self.matches.as_ref()
    }

    /// Update the search box contents.  The match list is dropped only when
    /// the pattern or the case flag actually changed.
    pub fn set_query(&mut self, pattern: impl Into<String>, match_case: bool) {
        let query = SearchQuery::new(pattern, match_case);
        if query != self.query {
            self.query = query;
            self.on_query_changed();
        }
    }

    // ── Notifications ─────────────────────────────────────────────────────────

    pub fn on_query_changed(&mut self) {
        self.invalidate();
    }

    pub fn on_text_changed(&mut self) {
        self.invalidate();
    }

    pub fn on_active_document_switched(&mut self) {
        self.invalidate();
    }

    /// The find bar was shown.  Matches from an earlier session are stale.
    pub fn open(&mut self) {
        self.invalidate();
    }

    /// The find bar was closed: forget everything.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    fn invalidate(&mut self) {
        self.matches = None;
        self.cursor = None;
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// The match the cursor points at.
    pub fn current(&self) -> Option<Match> {
        self.matches.as_ref()?.get(self.cursor?)
    }

    /// Position indicator, or `None` while no match list is computed.
    pub fn status(&self) -> Option<MatchStatus> {
        self.matches.as_ref().map(|m| MatchStatus {
            current: self.cursor,
            total: m.len(),
        })
    }

    fn is_fresh<H: DocumentHost + ?Sized>(&self, host: &H) -> bool {
        self.matches
            .as_ref()
            .is_some_and(|m| m.stamp == host.stamp())
    }

    // ── Operations ────────────────────────────────────────────────────────────

    /// Rescan the host's text and reset the cursor.
    pub fn recompute<H: DocumentHost + ?Sized>(&mut self, host: &H) -> &MatchSet {
        let set = MatchSet::compute(&self.query, &host.text(), host.stamp());
        tracing::debug!(
            pattern = ?self.query.pattern,
            match_case = self.query.match_case,
            matches = set.len(),
            document = ?set.stamp.document,
            "recomputed matches"
        );
        self.cursor = None;
        self.matches.insert(set)
    }

    /// Move to the next match, wrapping to the first after the last, and
    /// select it on the host.
    ///
    /// Rescans first when the list is missing or was computed against other
    /// text.  The first call after a rescan lands on the earliest match.
    pub fn find_next<H: DocumentHost + ?Sized>(&mut self, host: &mut H) -> Option<Match> {
        if self.query.is_empty() {
            return None;
        }
        if !self.is_fresh(&*host) {
            self.recompute(&*host);
        }

        let matches = self.matches.as_ref()?;
        if matches.is_empty() {
            return None;
        }
        let next = self.cursor.map_or(0, |c| (c + 1) % matches.len());
        let found = matches.get(next)?;
        self.cursor = Some(next);

        host.set_selection(found.offset, found.len);
        Some(found)
    }

    /// Replace the current match with `replacement`.
    ///
    /// Never rescans beforehand: a missing or outdated match list is reported
    /// instead.  The text under the cursor is re-checked against the pattern
    /// so an edit the session was not told about cannot be clobbered.  After
    /// a replacement the list is rebuilt and the cursor keeps its index,
    /// clamped to the new list.
    pub fn replace_current<H: DocumentHost + ?Sized>(
        &mut self,
        host: &mut H,
        replacement: &str,
    ) -> ReplaceOutcome {
        if self.query.is_empty() {
            return ReplaceOutcome::Skipped(SkipReason::EmptyPattern);
        }
        let (Some(matches), Some(index)) = (self.matches.as_ref(), self.cursor) else {
            return ReplaceOutcome::Skipped(SkipReason::NoCurrentMatch);
        };
        let stamp = matches.stamp;
        let Some(target) = matches.get(index) else {
            self.invalidate();
            return ReplaceOutcome::Skipped(SkipReason::NoCurrentMatch);
        };

        if stamp != host.stamp() || !scan::matches_at(&self.query, &host.text(), target.offset) {
            tracing::warn!("match at {} is stale; nothing replaced", target.offset);
            self.invalidate();
            return ReplaceOutcome::Skipped(SkipReason::StaleMatch);
        }

        host.replace_range(target.offset, target.len, replacement);
        let match_count = self.recompute(&*host).len();
        self.cursor = match_count.checked_sub(1).map(|last| index.min(last));

        match self.current() {
            Some(next) => host.set_selection(next.offset, next.len),
            None => host.set_selection(target.offset + replacement.chars().count(), 0),
        }
        tracing::debug!("replaced match at {}; {match_count} left", target.offset);

        ReplaceOutcome::Replaced {
            offset: target.offset,
            match_count,
        }
    }

    /// Replace every occurrence in one left-to-right pass and hand the new
    /// text to the host in a single update.  Returns the number of
    /// replacements; the match list is cleared either way.
    pub fn replace_all<H: DocumentHost + ?Sized>(&mut self, host: &mut H, replacement: &str) -> usize {
        if self.query.is_empty() {
            return 0;
        }
        let (text, count) = scan::replace_all(&self.query, &host.text(), replacement);
        if count > 0 {
            host.set_text(text);
        }
        self.invalidate();
        tracing::debug!("replaced {count} occurrences of {:?}", self.query.pattern);
        count
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
