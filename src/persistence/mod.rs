//! High score persistence
//!
//! The save state is two fields flushed wholesale as JSON to a fixed file
//! name. Writes go to a temporary file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Save file name, relative to the save directory
pub const SAVE_FILE_NAME: &str = "save.dat";

/// Persisted high score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SaveState {
    pub high_score: i32,
    /// Unix timestamp (ms) when the high score was set, 0 if never
    pub high_score_date: f64,
}

/// Failure reading or writing a JSON file on disk
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed data in {}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// File-backed [`SaveState`] storage
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store using [`SAVE_FILE_NAME`] inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SAVE_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SaveState, StorageError> {
        let json = fs::read_to_string(&self.path).map_err(|source| self.io_error(source))?;
        serde_json::from_str(&json).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, state: &SaveState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state).map_err(|source| StorageError::Format {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|source| self.io_error(source))?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(self.io_error(source));
        }
        log::info!(
            "Saved high score {} to {}",
            state.high_score,
            self.path.display()
        );
        Ok(())
    }

    /// Overwrite the save with zeros
    pub fn reset(&self) -> Result<SaveState, StorageError> {
        let state = SaveState::default();
        self.save(&state)?;
        Ok(state)
    }

    /// Load, logging and falling back to defaults on any failure
    pub fn load_or_default(&self) -> SaveState {
        match self.load() {
            Ok(state) => {
                log::info!("Loaded high score {}", state.high_score);
                state
            }
            Err(StorageError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::info!("No save file found, starting fresh");
                SaveState::default()
            }
            Err(e) => {
                log::warn!("Could not load save file: {e}");
                SaveState::default()
            }
        }
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

/// Current wall clock as unix milliseconds
pub fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Describe how long ago `timestamp` was, relative to `now` (both unix ms)
pub fn format_age(timestamp: f64, now: f64) -> String {
    if timestamp <= 0.0 {
        return "never".to_string();
    }
    let diff_mins = (now - timestamp) / 1000.0 / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "yesterday".to_string()
        } else {
            format!("{} days ago", days)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "just now".to_string()
    }
}
