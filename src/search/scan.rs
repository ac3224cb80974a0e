// ── Literal substring scanning ────────────────────────────────────────────────
//
// All offsets are character offsets.  Case-insensitive comparison folds each
// character to one character (ordinal, not locale aware), so an offset
// computed on folded text is valid in the unfolded text.

use super::SearchQuery;

/// Fold a character for comparison under `match_case`.
///
/// Uses the uppercase form when it is a single character.  Otherwise (`ß`,
/// `ᾳ`, `ŉ`, …) falls back to the single-character lowercase form, so a
/// titlecase letter such as `ᾼ` still meets its lowercase `ᾳ`.  A character
/// with neither is compared as-is.
fn fold(c: char, match_case: bool) -> char {
    if match_case {
        return c;
    }
    single(c.to_uppercase())
        .or_else(|| single(c.to_lowercase()))
        .unwrap_or(c)
}

fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    match (mapped.next(), mapped.next()) {
        (Some(m), None) => Some(m),
        _ => None,
    }
}

fn folded(s: &str, match_case: bool) -> Vec<char> {
    s.chars().map(|c| fold(c, match_case)).collect()
}

/// Offset of the next occurrence of `needle` in `hay` at or after `from`.
///
/// Naive window compare: O(len(hay) * len(needle)) worst case.
fn index_of(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || hay.len() < needle.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

/// Every non-overlapping occurrence of the query's pattern, left to right.
///
/// After a hit at `i` the scan resumes at `i + len(pattern)`, so `"aaaa"`
/// searched for `"aa"` yields `[0, 2]`, never `[0, 1, 2]`.  An empty pattern
/// yields no matches.
pub(crate) fn find_all(query: &SearchQuery, text: &str) -> Vec<usize> {
    let needle = folded(&query.pattern, query.match_case);
    if needle.is_empty() {
        return Vec::new();
    }
    let hay = folded(text, query.match_case);

    let mut offsets = Vec::new();
    let mut from = 0;
    while let Some(i) = index_of(&hay, &needle, from) {
        offsets.push(i);
        from = i + needle.len();
    }
    offsets
}

/// `true` when the text at `offset` still equals the pattern.
pub(crate) fn matches_at(query: &SearchQuery, text: &str, offset: usize) -> bool {
    if query.is_empty() {
        return false;
    }
    let mut candidate = text.chars().skip(offset);
    query
        .pattern
        .chars()
        .all(|p| candidate.next().is_some_and(|c| fold(c, query.match_case) == fold(p, query.match_case)))
}

/// Replace every non-overlapping occurrence in one pass.
///
/// Unmatched spans are copied verbatim; replacement text is never rescanned.
/// Returns the new text and the number of replacements.
pub(crate) fn replace_all(query: &SearchQuery, text: &str, replacement: &str) -> (String, usize) {
    let offsets = find_all(query, text);
    if offsets.is_empty() {
        return (text.to_owned(), 0);
    }
    let pattern_len = query.char_len();

    let mut out = String::with_capacity(text.len());
    let mut hits = offsets.iter().copied().peekable();
    let mut skip_until = 0;
    for (i, c) in text.chars().enumerate() {
        if hits.peek() == Some(&i) {
            hits.next();
            out.push_str(replacement);
            skip_until = i + pattern_len;
        }
        if i >= skip_until {
            out.push(c);
        }
    }
    (out, offsets.len())
}
