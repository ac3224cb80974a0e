// ── Session persistence ───────────────────────────────────────────────────────
//
// Reads and writes `<config dir>/quillpad/session.json`: which files were
// open, which tab was active, and the last find settings.  Pure safe Rust +
// serde_json.

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    pub version: u32,
    pub tabs: Vec<TabEntry>,
    pub active_tab: usize,
    #[serde(default)] // older files have no find settings
    pub find: FindSettings,
}

/// One entry per open tab that has a file behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabEntry {
    pub path: PathBuf,
    /// Caret position in characters.
    #[serde(default)]
    pub caret_pos: usize,
}

/// The find bar's contents when the session was saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindSettings {
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub match_case: bool,
}

// ── Format version ────────────────────────────────────────────────────────────

pub const SESSION_VERSION: u32 = 1;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the session file.
///
/// Returns `None` when the platform has no per-user config directory.
pub fn session_path() -> Option<PathBuf> {
    let mut p = dirs::config_dir()?;
    p.push("quillpad");
    p.push("session.json");
    Some(p)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write `session` to `path`, creating the parent directory if needed.
pub fn save_to(path: &Path, session: &SessionFile) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, session)?;
    tracing::debug!("session written to {}", path.display());
    Ok(())
}

/// Write `session` to the default location.  A platform without a config
/// directory silently skips the write.
pub fn save(session: &SessionFile) -> Result<()> {
    match session_path() {
        Some(path) => save_to(&path, session),
        None => Ok(()),
    }
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the session file at `path`.
///
/// Returns `None` on any error: file missing, JSON parse failure, or an
/// unrecognised version number.  The app then starts with a fresh tab.
pub fn load_from(path: &Path) -> Option<SessionFile> {
    let data = fs::read(path).ok()?;
    let sf: SessionFile = match serde_json::from_slice(&data) {
        Ok(sf) => sf,
        Err(e) => {
            tracing::warn!("ignoring unreadable session file {}: {e}", path.display());
            return None;
        }
    };
    if sf.version != SESSION_VERSION {
        tracing::warn!("ignoring session file version {}", sf.version);
        return None;
    }
    Some(sf)
}

/// Read the session file from the default location.
pub fn load() -> Option<SessionFile> {
    load_from(&session_path()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionFile {
        SessionFile {
            version: SESSION_VERSION,
            tabs: vec![
                TabEntry {
                    path: PathBuf::from("/notes/a.txt"),
                    caret_pos: 10,
                },
                TabEntry {
                    path: PathBuf::from("/notes/b.txt"),
                    caret_pos: 0,
                },
            ],
            active_tab: 1,
            find: FindSettings {
                pattern: "todo".to_owned(),
                match_case: true,
            },
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");
        save_to(&path, &sample()).expect("save");
        assert_eq!(load_from(&path), Some(sample()));
    }

    #[test]
    fn find_settings_default_when_absent() {
        let json = r#"{"version":1,"tabs":[{"path":"/a.txt"}],"active_tab":0}"#;
        let sf: SessionFile = serde_json::from_str(json).expect("deserialize old format");
        assert_eq!(sf.find, FindSettings::default());
        assert_eq!(sf.tabs[0].caret_pos, 0);
    }

    #[test]
    fn wrong_version_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        let sf = SessionFile {
            version: 99,
            ..sample()
        };
        save_to(&path, &sf).expect("save");
        assert_eq!(load_from(&path), None);
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").expect("write");
        assert_eq!(load_from(&path), None);
    }

    #[test]
    fn default_path_lives_under_quillpad() {
        if let Some(path) = session_path() {
            assert!(path.ends_with("quillpad/session.json"));
        }
    }

    #[test]
    fn missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load_from(&dir.path().join("absent.json")), None);
    }
}
