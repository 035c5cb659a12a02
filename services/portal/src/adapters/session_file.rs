//! services/portal/src/adapters/session_file.rs
//!
//! Session storage backed by a single JSON file. Writes go to a temporary
//! file in the same directory which is then renamed over the target, so a
//! reader sees either the previous record or the new one, never a mix.

use portal_core::ports::{PersistedSession, PortError, PortResult, SessionStorage};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

fn storage_err(context: &str, e: impl std::fmt::Display) -> PortError {
    PortError::Storage(format!("{}: {}", context, e))
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> PortResult<PersistedSession> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| storage_err("corrupt session file", e)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PersistedSession::default()),
            Err(e) => Err(storage_err("failed to read session file", e)),
        }
    }

    fn save(&self, record: &PersistedSession) -> PortResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(dir).map_err(|e| storage_err("failed to create session dir", e))?;

        let json = serde_json::to_vec_pretty(record)
            .map_err(|e| storage_err("failed to encode session", e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| storage_err("failed to create temp file", e))?;
        tmp.write_all(&json)
            .map_err(|e| storage_err("failed to write session", e))?;
        tmp.persist(&self.path)
            .map_err(|e| storage_err("failed to persist session", e.error))?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> PortResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err("failed to remove session file", e)),
        }
    }
}
