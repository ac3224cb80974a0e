// ── Tab set ───────────────────────────────────────────────────────────────────
//
// Pure Rust state that mirrors the tab strip: the open documents in display
// order plus which one is active.  No toolkit calls here; a UI layer renders
// `tab_label` for each entry and forwards clicks to `select` / `close`.

use std::path::Path;

use crate::editor::{Document, DocumentHost, DocumentId};
use crate::error::Result;

/// Compute the display label for a tab from its document.
///
/// Format:
/// - Untitled, clean  → `"Untitled"`
/// - Untitled, dirty  → `"*Untitled"`
/// - Named, clean     → `"filename.txt"`
/// - Named, dirty     → `"*filename.txt"`
pub fn tab_label(doc: &Document) -> String {
    let name = doc.display_name();
    if doc.is_dirty() {
        format!("*{name}")
    } else {
        name
    }
}

/// The open documents and the active one.
#[derive(Debug, Default)]
pub struct TabSet {
    docs: Vec<Document>,
    /// Index into `docs`; `None` only when `docs` is empty.
    active: Option<usize>,
    next_id: u64,
}

impl TabSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> DocumentId {
        self.next_id += 1;
        DocumentId(self.next_id)
    }

    fn push_active(&mut self, doc: Document) -> DocumentId {
        let id = doc.id();
        self.docs.push(doc);
        self.active = Some(self.docs.len() - 1);
        id
    }

    /// Append a new, clean tab and make it active.
    pub fn new_tab(&mut self, name: Option<String>, content: String) -> DocumentId {
        let id = self.allocate_id();
        self.push_active(Document::with_text(id, name, content))
    }

    /// Read `path` into a new active tab.  On error no tab is added.
    pub fn open(&mut self, path: &Path) -> Result<DocumentId> {
        let id = self.allocate_id();
        let doc = Document::open(id, path)?;
        Ok(self.push_active(doc))
    }

    /// Remove the tab at `index` and return its document.
    ///
    /// When the active tab closes, the tab that slides into its place (or
    /// the new last tab) becomes active.
    pub fn close(&mut self, index: usize) -> Option<Document> {
        if index >= self.docs.len() {
            return None;
        }
        let doc = self.docs.remove(index);
        self.active = match self.active {
            _ if self.docs.is_empty() => None,
            Some(active) if active > index => Some(active - 1),
            Some(active) => Some(active.min(self.docs.len() - 1)),
            None => None,
        };
        tracing::info!("closed tab {index} ({})", doc.display_name());
        Some(doc)
    }

    /// Make the tab at `index` active.  Returns `false` when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.docs.len() {
            self.active = Some(index);
            true
        } else {
            false
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active(&self) -> Option<&Document> {
        self.docs.get(self.active?)
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        self.docs.get_mut(self.active?)
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active().map(DocumentHost::id)
    }

    pub fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn three_tabs() -> TabSet {
        let mut tabs = TabSet::new();
        for name in ["a", "b", "c"] {
            tabs.new_tab(Some(name.to_owned()), String::new());
        }
        tabs
    }

    fn active_name(tabs: &TabSet) -> Option<String> {
        tabs.active().map(Document::display_name)
    }

    #[test]
    fn label_clean_untitled() {
        let doc = Document::untitled(DocumentId(1));
        assert_eq!(tab_label(&doc), "Untitled");
    }

    #[test]
    fn label_dirty_untitled() {
        let mut doc = Document::untitled(DocumentId(1));
        doc.set_text("x".into());
        assert_eq!(tab_label(&doc), "*Untitled");
    }

    #[test]
    fn label_named() {
        let mut doc = Document::from_bytes(DocumentId(1), PathBuf::from("/notes/todo.txt"), b"");
        assert_eq!(tab_label(&doc), "todo.txt");
        doc.replace_range(0, 0, "x");
        assert_eq!(tab_label(&doc), "*todo.txt");
    }

    #[test]
    fn new_tabs_become_active_with_unique_ids() {
        let tabs = three_tabs();
        assert_eq!(tabs.len(), 3);
        assert_eq!(active_name(&tabs).as_deref(), Some("c"));
        let ids: Vec<_> = tabs.iter().map(DocumentHost::id).collect();
        assert_eq!(ids, vec![DocumentId(1), DocumentId(2), DocumentId(3)]);
    }

    #[test]
    fn closing_the_active_tab_selects_its_neighbour() {
        let mut tabs = three_tabs();
        tabs.select(1);
        tabs.close(1);
        assert_eq!(active_name(&tabs).as_deref(), Some("c"));
        tabs.close(1);
        assert_eq!(active_name(&tabs).as_deref(), Some("a"));
        tabs.close(0);
        assert!(tabs.active().is_none());
        assert!(tabs.is_empty());
    }

    #[test]
    fn closing_an_earlier_tab_keeps_the_active_document() {
        let mut tabs = three_tabs();
        tabs.close(0);
        assert_eq!(tabs.active_index(), Some(1));
        assert_eq!(active_name(&tabs).as_deref(), Some("c"));
    }

    #[test]
    fn closing_a_later_tab_keeps_the_active_document() {
        let mut tabs = three_tabs();
        tabs.select(0);
        tabs.close(2);
        assert_eq!(active_name(&tabs).as_deref(), Some("a"));
    }

    #[test]
    fn out_of_range_requests_are_ignored() {
        let mut tabs = three_tabs();
        assert!(tabs.close(9).is_none());
        assert!(!tabs.select(3));
        assert_eq!(tabs.active_index(), Some(2));
    }

    #[test]
    fn failed_open_adds_no_tab() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut tabs = three_tabs();
        assert!(tabs.open(&dir.path().join("missing.txt")).is_err());
        assert_eq!(tabs.len(), 3);
        assert_eq!(active_name(&tabs).as_deref(), Some("c"));
    }

    #[test]
    fn open_reads_the_file_into_a_new_tab() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello").expect("write");
        let mut tabs = TabSet::new();
        tabs.open(&path).expect("open");
        let doc = tabs.active().expect("active tab");
        assert_eq!(doc.as_str(), "hello");
        assert_eq!(doc.display_name(), "hello.txt");
    }
}
