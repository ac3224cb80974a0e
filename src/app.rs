// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by the UI layer for the
// lifetime of the main window.  All mutations happen on the UI thread; there
// is no global mutable state.  Every user action that can make the find
// session's match list outdated goes through here so the session hears about
// it.

use std::path::{Path, PathBuf};

use crate::editor::{Document, DocumentHost, DocumentId};
use crate::error::{QuillError, Result};
use crate::search::{FindSession, Match, ReplaceOutcome, SkipReason};
use crate::session::{FindSettings, SessionFile, TabEntry, SESSION_VERSION};
use crate::ui::tabs::TabSet;

const APP_NAME: &str = "Quillpad";

// ── Notice ────────────────────────────────────────────────────────────────────

/// A dismissible message for the user, e.g. a failed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl From<&QuillError> for Notice {
    fn from(e: &QuillError) -> Self {
        Self {
            message: e.to_string(),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference through UI event handlers so that all
/// application logic sees a single, explicit state root rather than a
/// collection of disconnected globals.
#[derive(Debug)]
pub struct App {
    tabs: TabSet,
    find: FindSession,
    find_bar_visible: bool,
    notice: Option<Notice>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create a fresh `App` with one untitled, empty tab.
    pub fn new() -> Self {
        let mut tabs = TabSet::new();
        tabs.new_tab(None, String::new());
        Self {
            tabs,
            find: FindSession::new(),
            find_bar_visible: false,
            notice: None,
        }
    }

    pub fn tabs(&self) -> &TabSet {
        &self.tabs
    }

    pub fn find(&self) -> &FindSession {
        &self.find
    }

    pub fn active(&self) -> Option<&Document> {
        self.tabs.active()
    }

    /// Run a tab-set change and tell the find session if the active document
    /// is no longer the same one.
    fn switching<T>(&mut self, change: impl FnOnce(&mut TabSet) -> T) -> T {
        let before = self.tabs.active_id();
        let out = change(&mut self.tabs);
        if self.tabs.active_id() != before {
            self.find.on_active_document_switched();
        }
        out
    }

    /// Store `e` as the current notice and hand it back.
    fn report(&mut self, e: QuillError) -> QuillError {
        tracing::error!("{e}");
        self.notice = Some(Notice::from(&e));
        e
    }

    // ── Tabs ──────────────────────────────────────────────────────────────────

    pub fn new_tab(&mut self) -> DocumentId {
        self.switching(|tabs| tabs.new_tab(None, String::new()))
    }

    /// Open `path` in a new tab.  A read failure becomes a notice and no tab
    /// is added.
    pub fn open_file(&mut self, path: &Path) -> Result<DocumentId> {
        match self.switching(|tabs| tabs.open(path)) {
            Ok(id) => Ok(id),
            Err(e) => Err(self.report(e)),
        }
    }

    pub fn close_tab(&mut self, index: usize) -> Option<Document> {
        self.switching(|tabs| tabs.close(index))
    }

    pub fn select_tab(&mut self, index: usize) -> bool {
        self.switching(|tabs| tabs.select(index))
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// A user edit in the active document.
    pub fn edit_active(&mut self, start: usize, len: usize, text: &str) -> bool {
        let Some(doc) = self.tabs.active_mut() else {
            return false;
        };
        doc.replace_range(start, len, text);
        self.find.on_text_changed();
        true
    }

    /// Replace the active document's whole text (paste over all, reload, …).
    pub fn set_active_text(&mut self, text: String) -> bool {
        let Some(doc) = self.tabs.active_mut() else {
            return false;
        };
        doc.set_text(text);
        self.find.on_text_changed();
        true
    }

    // ── Saving ────────────────────────────────────────────────────────────────

    /// Save the active document to the file it came from.
    ///
    /// Untitled documents return `QuillError::Untitled`; the UI should ask
    /// for a path and call `save_active_as`.
    pub fn save_active(&mut self) -> Result<()> {
        let path = match self.tabs.active() {
            None => return Err(QuillError::NoActiveDocument),
            Some(doc) => doc.path().map(Path::to_path_buf).ok_or(QuillError::Untitled)?,
        };
        self.save_active_as(path)
    }

    /// Save the active document to `path`.  On failure the document keeps
    /// its text and dirty flag and a notice is raised.
    pub fn save_active_as(&mut self, path: PathBuf) -> Result<()> {
        let Some(doc) = self.tabs.active_mut() else {
            return Err(QuillError::NoActiveDocument);
        };
        match doc.save_to(path) {
            Ok(()) => Ok(()),
            Err(e) => Err(self.report(e)),
        }
    }

    // ── Notices ───────────────────────────────────────────────────────────────

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ── Find bar ──────────────────────────────────────────────────────────────

    pub fn is_find_bar_visible(&self) -> bool {
        self.find_bar_visible
    }

    pub fn toggle_find_bar(&mut self) {
        if self.find_bar_visible {
            self.close_find_bar();
        } else {
            self.find_bar_visible = true;
            self.find.open();
        }
    }

    pub fn close_find_bar(&mut self) {
        self.find_bar_visible = false;
        self.find.close();
    }

    pub fn set_find_query(&mut self, pattern: &str, match_case: bool) {
        self.find.set_query(pattern, match_case);
    }

    pub fn find_next(&mut self) -> Option<Match> {
        let doc = self.tabs.active_mut()?;
        self.find.find_next(doc)
    }

    pub fn replace(&mut self, replacement: &str) -> ReplaceOutcome {
        match self.tabs.active_mut() {
            Some(doc) => self.find.replace_current(doc, replacement),
            None => ReplaceOutcome::Skipped(SkipReason::NoActiveDocument),
        }
    }

    pub fn replace_all(&mut self, replacement: &str) -> usize {
        match self.tabs.active_mut() {
            Some(doc) => self.find.replace_all(doc, replacement),
            None => 0,
        }
    }

    // ── Display ───────────────────────────────────────────────────────────────

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No tabs, or untitled and clean | `"Quillpad"` |
    /// | Path set, clean | `"filename — Quillpad"` |
    /// | Path set, dirty | `"*filename — Quillpad"` |
    /// | No path, dirty | `"*Untitled — Quillpad"` |
    pub fn window_title(&self) -> String {
        let Some(doc) = self.tabs.active() else {
            return APP_NAME.to_owned();
        };
        if doc.path().is_none() && !doc.is_dirty() {
            return APP_NAME.to_owned();
        }
        let dirty = if doc.is_dirty() { "*" } else { "" };
        format!("{dirty}{} \u{2014} {APP_NAME}", doc.display_name())
    }

    /// Status-bar text: encoding, line endings and, once a search has run,
    /// the match position.
    pub fn status_text(&self) -> String {
        let Some(doc) = self.tabs.active() else {
            return String::new();
        };
        let mut parts = vec![doc.encoding().as_str().to_owned(), doc.eol().as_str().to_owned()];
        if let Some(status) = self.find.status() {
            parts.push(status.to_string());
        }
        parts.join(" \u{b7} ")
    }

    // ── Session ───────────────────────────────────────────────────────────────

    /// Describe the open file-backed tabs and find settings for
    /// `session::save`.  Untitled tabs are not remembered.
    pub fn session_snapshot(&self) -> SessionFile {
        let mut tabs = Vec::new();
        let mut active_tab = 0;
        for (index, doc) in self.tabs.iter().enumerate() {
            let Some(path) = doc.path() else { continue };
            if Some(index) == self.tabs.active_index() {
                active_tab = tabs.len();
            }
            tabs.push(TabEntry {
                path: path.to_owned(),
                caret_pos: doc.selection().0,
            });
        }
        let query = self.find.query();
        SessionFile {
            version: SESSION_VERSION,
            tabs,
            active_tab,
            find: FindSettings {
                pattern: query.pattern.clone(),
                match_case: query.match_case,
            },
        }
    }

    /// Rebuild the tab set from a saved session.
    ///
    /// Files that can no longer be read are skipped with a warning.  When
    /// nothing could be restored the app keeps a single untitled tab.
    pub fn restore_session(session: &SessionFile) -> Self {
        let mut tabs = TabSet::new();
        let mut active = None;
        for (index, entry) in session.tabs.iter().enumerate() {
            match tabs.open(&entry.path) {
                Ok(_) => {
                    if let Some(doc) = tabs.active_mut() {
                        doc.set_selection(entry.caret_pos, 0);
                    }
                    if index == session.active_tab {
                        active = Some(tabs.len() - 1);
                    }
                }
                Err(e) => tracing::warn!("session tab skipped: {e}"),
            }
        }
        if tabs.is_empty() {
            tabs.new_tab(None, String::new());
        } else if let Some(index) = active {
            tabs.select(index);
        }

        let mut find = FindSession::new();
        find.set_query(session.find.pattern.as_str(), session.find.match_case);
        Self {
            tabs,
            find,
            find_bar_visible: false,
            notice: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
