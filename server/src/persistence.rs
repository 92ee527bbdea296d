//! JSON snapshot persistence.
//!
//! A snapshot is the serialized [`GameState`]. Saves go to a sibling `.tmp` file that is then
//! renamed over the snapshot, so readers only ever see a complete file.

use diceroller_types::GameState;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn};

#[derive(Debug, ThisError)]
pub enum PersistenceError {
    #[error("failed to read snapshot {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("snapshot {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write snapshot {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("snapshot task failed: {0}")]
    Task(String),
}

/// File-backed snapshot of one session.
pub struct SnapshotStore {
    path: PathBuf,
    temp_path: PathBuf,
    // Every saver shares the temp file, so write and rename run under one lock.
    write_lock: Mutex<()>,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let temp_path = temp_path(&path);
        Self {
            path,
            temp_path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot.
    ///
    /// A missing file is created with the default state. A file that does not parse is
    /// overwritten with the default state. Keys missing from an older snapshot come back
    /// with their defaults.
    pub fn load(&self) -> Result<GameState, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no snapshot found; writing defaults");
                return self.reset_to_default();
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match decode(&self.path, &bytes) {
            Ok(state) => {
                debug!(
                    path = %self.path.display(),
                    total_rolls = state.total_rolls,
                    history = state.history.len(),
                    "loaded snapshot"
                );
                Ok(state)
            }
            Err(err) => {
                warn!(%err, "replacing corrupt snapshot with defaults");
                self.reset_to_default()
            }
        }
    }

    /// Atomically replaces the snapshot with `state`.
    ///
    /// On failure the temp file is removed and the previous snapshot is left as it was.
    pub fn save(&self, state: &GameState) -> Result<(), PersistenceError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let result = fs::write(&self.temp_path, &bytes)
            .and_then(|()| fs::rename(&self.temp_path, &self.path));
        if let Err(source) = result {
            error!(path = %self.path.display(), %source, "snapshot save failed");
            if self.temp_path.exists() {
                if let Err(err) = fs::remove_file(&self.temp_path) {
                    warn!(path = %self.temp_path.display(), %err, "failed to remove temp snapshot");
                }
            }
            return Err(PersistenceError::Write {
                path: self.path.clone(),
                source,
            });
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved snapshot");
        Ok(())
    }

    fn reset_to_default(&self) -> Result<GameState, PersistenceError> {
        let state = GameState::default();
        self.save(&state)?;
        Ok(state)
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Result<GameState, PersistenceError> {
    serde_json::from_slice(bytes).map_err(|source| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("state.json"));
    name.push(".tmp");
    path.with_file_name(name)
}
