// ── Editor component abstraction ──────────────────────────────────────────────
//
// The find/replace engine never touches a concrete text control.  Anything
// that can hand out its text, splice a range and move its selection can host
// a find session: a native edit control, a GUI text box, or the in-memory
// `Document` used by the tab set and the CLI.

use std::borrow::Cow;

mod document;

pub use document::{Document, Encoding, EolMode};

// ── Identity ──────────────────────────────────────────────────────────────────

/// Opaque identifier of an open document, unique within one `TabSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

/// Which text a match list was computed against.
///
/// Two stamps are equal only when they name the same document at the same
/// revision, i.e. no edit happened in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStamp {
    pub document: DocumentId,
    pub revision: u64,
}

// ── Host contract ─────────────────────────────────────────────────────────────

/// An editable text buffer addressed by character offsets.
///
/// Implementations must bump [`revision`](Self::revision) on every text
/// mutation, including those made through `set_text` and `replace_range`.
pub trait DocumentHost {
    fn id(&self) -> DocumentId;

    /// Monotonic edit counter.
    fn revision(&self) -> u64;

    /// The full text of the buffer.
    fn text(&self) -> Cow<'_, str>;

    /// Replace the whole text in one step.
    fn set_text(&mut self, text: String);

    /// Replace `len` characters starting at `start` with `text`.
    ///
    /// Out-of-range spans are clamped to the end of the buffer.
    fn replace_range(&mut self, start: usize, len: usize, text: &str);

    /// Select `len` characters starting at `start`; `len == 0` only places
    /// the caret and clears any highlight.
    fn set_selection(&mut self, start: usize, len: usize);

    /// Current selection as `(start, len)`.
    fn selection(&self) -> (usize, usize);

    fn stamp(&self) -> TextStamp {
        TextStamp {
            document: self.id(),
            revision: self.revision(),
        }
    }
}
