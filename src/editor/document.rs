// ── In-memory document ────────────────────────────────────────────────────────
//
// The text of one tab plus what is needed to write it back to disk in the
// form it was read.  The text is always held as a Rust `String`; `encoding`
// records the on-disk form.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::{DocumentHost, DocumentId};
use crate::error::{QuillError, Result};

// ── Encoding ──────────────────────────────────────────────────────────────────

/// The character encoding of the document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// UTF-8 without BOM.
    Utf8,
    /// UTF-8 with a leading `EF BB BF` BOM, kept on save.
    Utf8Bom,
    /// UTF-16 Little-Endian with BOM.
    Utf16Le,
    /// UTF-16 Big-Endian with BOM.
    Utf16Be,
    /// Anything that is not valid UTF-8.  Bytes are read as Latin-1, one
    /// character per byte, and written back the same way.
    Ansi,
}

impl Encoding {
    /// Short display string shown in the status bar.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf8Bom => "UTF-8 BOM",
            Self::Utf16Le => "UTF-16 LE",
            Self::Utf16Be => "UTF-16 BE",
            Self::Ansi => "ANSI",
        }
    }
}

// ── EOL mode ──────────────────────────────────────────────────────────────────

/// The end-of-line convention used by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolMode {
    /// Windows-style `\r\n`.
    Crlf,
    /// Unix-style `\n`.
    Lf,
    /// Old Mac-style `\r`.
    Cr,
}

impl EolMode {
    /// Short display string shown in the status bar.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "CRLF",
            Self::Lf => "LF",
            Self::Cr => "CR",
        }
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// One open document.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    /// Absolute path to the file on disk, or `None` for an untitled buffer.
    path: Option<PathBuf>,
    /// Tab header for buffers that were created with a name but no path.
    name: Option<String>,
    encoding: Encoding,
    eol: EolMode,
    /// `true` when the buffer contains changes not yet saved to disk.
    dirty: bool,
    text: String,
    revision: u64,
    /// `(start, len)` in characters.
    selection: (usize, usize),
}

impl Document {
    /// A fresh, empty, untitled document.
    pub fn untitled(id: DocumentId) -> Self {
        Self::with_text(id, None, String::new())
    }

    /// A clean, unsaved document with the given header and content.
    pub fn with_text(id: DocumentId, name: Option<String>, text: String) -> Self {
        Self {
            id,
            path: None,
            name,
            encoding: Encoding::Utf8,
            eol: detect_eol(&text),
            dirty: false,
            text,
            revision: 0,
            selection: (0, 0),
        }
    }

    /// Read `path` from disk.
    pub fn open(id: DocumentId, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| QuillError::Read {
            path: path.to_owned(),
            source,
        })?;
        tracing::info!("opened {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(id, path.to_owned(), &bytes))
    }

    /// Build a document from raw file contents.
    ///
    /// Encoding detection order:
    /// 1. UTF-16 LE BOM (`FF FE`)
    /// 2. UTF-16 BE BOM (`FE FF`)
    /// 3. UTF-8 BOM (`EF BB BF`)
    /// 4. Heuristic: if the bytes are valid UTF-8, treat as UTF-8
    /// 5. Fallback: ANSI
    pub fn from_bytes(id: DocumentId, path: PathBuf, bytes: &[u8]) -> Self {
        let (encoding, text) = detect_and_decode(bytes);
        Self {
            encoding,
            path: Some(path),
            ..Self::with_text(id, None, text)
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn eol(&self) -> EolMode {
        self.eol
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The bare filename component, the tab header, or `"Untitled"`.
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| "Untitled".to_owned())
    }

    /// 1-based `(line, column)` of a character offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let mut line = 1;
        let mut col = 1;
        let mut chars = self.text.chars().take(offset).peekable();
        while let Some(c) = chars.next() {
            let line_break = c == '\n' || (c == '\r' && chars.peek() != Some(&'\n'));
            if line_break {
                line += 1;
                col = 1;
            } else if c != '\r' {
                col += 1;
            }
        }
        (line, col)
    }

    // ── File save ─────────────────────────────────────────────────────────────

    /// Write the document to `path` using its current encoding.
    ///
    /// On success, records `path` (for Save As) and clears the dirty flag.
    /// On failure the document is left exactly as it was, still dirty.
    pub fn save_to(&mut self, path: PathBuf) -> Result<()> {
        let bytes = self.encode_for_disk();
        if let Err(source) = std::fs::write(&path, &bytes) {
            return Err(QuillError::Write { path, source });
        }
        tracing::info!("saved {} ({} bytes)", path.display(), bytes.len());
        self.path = Some(path);
        self.dirty = false;
        Ok(())
    }

    /// Re-encode the text to the document's on-disk encoding.
    pub fn encode_for_disk(&self) -> Vec<u8> {
        match self.encoding {
            Encoding::Utf8 => self.text.as_bytes().to_vec(),
            Encoding::Utf8Bom => {
                let mut out = UTF8_BOM.to_vec();
                out.extend_from_slice(self.text.as_bytes());
                out
            }
            Encoding::Utf16Le => {
                let mut out = vec![0xFF_u8, 0xFE]; // LE BOM
                for unit in self.text.encode_utf16() {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                out
            }
            Encoding::Utf16Be => {
                let mut out = vec![0xFE_u8, 0xFF]; // BE BOM
                for unit in self.text.encode_utf16() {
                    out.extend_from_slice(&unit.to_be_bytes());
                }
                out
            }
            // Latin-1 back to bytes; anything outside it cannot be stored.
            Encoding::Ansi => self
                .text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
        }
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }
}

impl DocumentHost for Document {
    fn id(&self) -> DocumentId {
        self.id
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.selection = (0, 0);
        self.touch();
    }

    fn replace_range(&mut self, start: usize, len: usize, text: &str) {
        let count = self.char_count();
        let start = start.min(count);
        let end = start.saturating_add(len).min(count);
        let range = char_to_byte(&self.text, start)..char_to_byte(&self.text, end);
        self.text.replace_range(range, text);
        self.selection = (start + text.chars().count(), 0);
        self.touch();
    }

    fn set_selection(&mut self, start: usize, len: usize) {
        let count = self.char_count();
        let start = start.min(count);
        self.selection = (start, len.min(count - start));
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }
}

// ── Decoding helpers ──────────────────────────────────────────────────────────

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Byte index of the character at `char_idx`, or `text.len()` past the end.
fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(byte_idx, _)| byte_idx)
}

/// Detect the encoding of `bytes` and decode them.
fn detect_and_decode(bytes: &[u8]) -> (Encoding, String) {
    if let Some(payload) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        return (Encoding::Utf16Le, String::from_utf16_lossy(&units));
    }

    if let Some(payload) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = payload
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return (Encoding::Utf16Be, String::from_utf16_lossy(&units));
    }

    let (encoding, body) = match bytes.strip_prefix(&UTF8_BOM) {
        Some(body) => (Encoding::Utf8Bom, body),
        None => (Encoding::Utf8, bytes),
    };
    match std::str::from_utf8(body) {
        Ok(text) => (encoding, text.to_owned()),
        Err(_) => (Encoding::Ansi, bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Detect the dominant EOL style.
///
/// Counts `\r\n`, lone `\r` and lone `\n` and returns whichever appears most.
/// Falls back to `EolMode::Crlf` when no line endings are present.
fn detect_eol(text: &str) -> EolMode {
    let bytes = text.as_bytes();
    let mut crlf = 0usize;
    let mut lf = 0usize;
    let mut cr = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                crlf += 1;
                i += 2;
            }
            b'\r' => {
                cr += 1;
                i += 1;
            }
            b'\n' => {
                lf += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    if crlf >= lf && crlf >= cr {
        EolMode::Crlf
    } else if lf >= cr {
        EolMode::Lf
    } else {
        EolMode::Cr
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> Document {
        Document::with_text(DocumentId(1), None, text.to_owned())
    }

    #[test]
    fn display_names() {
        assert_eq!(Document::untitled(DocumentId(1)).display_name(), "Untitled");
        let named = Document::with_text(DocumentId(1), Some("scratch".into()), String::new());
        assert_eq!(named.display_name(), "scratch");
        let opened = Document::from_bytes(DocumentId(1), PathBuf::from("/tmp/todo.txt"), b"x");
        assert_eq!(opened.display_name(), "todo.txt");
    }

    #[test]
    fn encoding_display() {
        assert_eq!(Encoding::Utf8.as_str(), "UTF-8");
        assert_eq!(Encoding::Utf16Le.as_str(), "UTF-16 LE");
        assert_eq!(Encoding::Utf16Be.as_str(), "UTF-16 BE");
        assert_eq!(Encoding::Ansi.as_str(), "ANSI");
    }

    #[test]
    fn eol_display() {
        assert_eq!(EolMode::Crlf.as_str(), "CRLF");
        assert_eq!(EolMode::Lf.as_str(), "LF");
        assert_eq!(EolMode::Cr.as_str(), "CR");
    }

    #[test]
    fn detect_encoding_utf16le() {
        let (enc, text) = detect_and_decode(b"\xFF\xFEh\x00i\x00");
        assert_eq!(enc, Encoding::Utf16Le);
        assert_eq!(text, "hi");
    }

    #[test]
    fn detect_encoding_utf16be() {
        let (enc, text) = detect_and_decode(b"\xFE\xFF\x00h\x00i");
        assert_eq!(enc, Encoding::Utf16Be);
        assert_eq!(text, "hi");
    }

    #[test]
    fn detect_encoding_utf8_bom() {
        let (enc, text) = detect_and_decode(b"\xEF\xBB\xBFhello");
        assert_eq!(enc, Encoding::Utf8Bom);
        assert_eq!(text, "hello");
    }

    #[test]
    fn utf8_bom_is_written_back() {
        let d = Document::from_bytes(DocumentId(1), PathBuf::from("a.txt"), b"\xEF\xBB\xBFhi");
        assert_eq!(d.encoding().as_str(), "UTF-8 BOM");
        assert_eq!(d.encode_for_disk(), b"\xEF\xBB\xBFhi");

        let plain = Document::from_bytes(DocumentId(2), PathBuf::from("b.txt"), b"hi");
        assert_eq!(plain.encode_for_disk(), b"hi");
    }

    #[test]
    fn save_keeps_the_utf8_bom() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bom.txt");
        std::fs::write(&path, b"\xEF\xBB\xBFold text").expect("write");
        let mut d = Document::open(DocumentId(1), &path).expect("open");
        d.replace_range(0, 3, "new");
        d.save_to(path.clone()).expect("save");
        assert_eq!(std::fs::read(&path).expect("read back"), b"\xEF\xBB\xBFnew text");
    }

    #[test]
    fn detect_encoding_ansi_fallback() {
        // 0xE9 opens a three-byte UTF-8 sequence that never completes
        let (enc, text) = detect_and_decode(b"caf\xE9");
        assert_eq!(enc, Encoding::Ansi);
        assert_eq!(text, "café");
    }

    #[test]
    fn ansi_round_trips_through_disk_encoding() {
        let d = Document::from_bytes(DocumentId(1), PathBuf::from("a.txt"), b"caf\xE9 \x80");
        assert_eq!(d.encode_for_disk(), b"caf\xE9 \x80");
    }

    #[test]
    fn utf16_writes_its_bom() {
        let d = Document::from_bytes(DocumentId(1), PathBuf::from("a.txt"), b"\xFF\xFEh\x00i\x00");
        assert_eq!(d.encode_for_disk(), b"\xFF\xFEh\x00i\x00");
    }

    #[test]
    fn detect_eol_styles() {
        assert_eq!(detect_eol("a\r\nb\r\nc\n"), EolMode::Crlf);
        assert_eq!(detect_eol("a\nb\nc\n"), EolMode::Lf);
        assert_eq!(detect_eol("a\rb\rc"), EolMode::Cr);
        assert_eq!(detect_eol("no newlines here"), EolMode::Crlf);
    }

    #[test]
    fn line_col_is_one_based() {
        let d = doc("ab\r\ncd\nef");
        assert_eq!(d.line_col(0), (1, 1));
        assert_eq!(d.line_col(1), (1, 2));
        assert_eq!(d.line_col(4), (2, 1));
        assert_eq!(d.line_col(8), (3, 2));
    }

    #[test]
    fn replace_range_uses_character_offsets() {
        let mut d = doc("héllo wörld");
        d.replace_range(6, 5, "there");
        assert_eq!(d.as_str(), "héllo there");
        assert_eq!(d.revision(), 1);
        assert!(d.is_dirty());
        assert_eq!(d.selection(), (11, 0));
    }

    #[test]
    fn replace_range_clamps_past_the_end() {
        let mut d = doc("abc");
        d.replace_range(2, 10, "Z");
        assert_eq!(d.as_str(), "abZ");
        d.replace_range(99, 1, "!");
        assert_eq!(d.as_str(), "abZ!");
    }

    #[test]
    fn set_text_bumps_revision_and_resets_selection() {
        let mut d = doc("abc");
        d.set_selection(1, 2);
        d.set_text("xyz".into());
        assert_eq!(d.revision(), 1);
        assert_eq!(d.selection(), (0, 0));
    }

    #[test]
    fn selection_is_clamped() {
        let mut d = doc("abc");
        d.set_selection(2, 5);
        assert_eq!(d.selection(), (2, 1));
        d.set_selection(7, 1);
        assert_eq!(d.selection(), (3, 0));
    }

    #[test]
    fn save_clears_dirty_and_records_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        let mut d = doc("abc");
        d.set_text("saved".into());
        d.save_to(path.clone()).expect("save");
        assert!(!d.is_dirty());
        assert_eq!(d.path(), Some(path.as_path()));
        assert_eq!(std::fs::read(&path).expect("read back"), b"saved");
    }

    #[test]
    fn failed_save_leaves_document_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-dir").join("out.txt");
        let mut d = doc("abc");
        d.set_text("edited".into());
        let err = d.save_to(path).expect_err("parent directory does not exist");
        assert!(matches!(err, QuillError::Write { .. }));
        assert!(d.is_dirty());
        assert_eq!(d.path(), None);
        assert_eq!(d.as_str(), "edited");
    }

    #[test]
    fn open_reports_missing_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Document::open(DocumentId(1), &dir.path().join("nope.txt")).expect_err("missing");
        assert!(matches!(err, QuillError::Read { .. }));
    }
}
