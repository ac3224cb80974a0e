// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible host operations in Quillpad return `error::Result<T>`.  The
// find/replace engine never fails: its "nothing happened" cases are reported
// through `search::SkipReason` instead.

use std::path::PathBuf;

use thiserror::Error;

/// Every error that Quillpad can produce.
#[derive(Debug, Error)]
pub enum QuillError {
    /// A file could not be read while opening a document.
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written while saving a document.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `save` was requested for a document that has never been saved.
    /// The UI is expected to ask for a path and call `save_as` instead.
    #[error("document has no file name yet")]
    Untitled,

    /// The operation needs an open document and none is active.
    #[error("no document is open")]
    NoActiveDocument,

    /// The session file could not be encoded or decoded.
    #[error("session file: {0}")]
    Session(#[from] serde_json::Error),

    /// Any other standard I/O error (session directory creation, …).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuillError>;
