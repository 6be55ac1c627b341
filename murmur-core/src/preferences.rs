// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local preferences
//!
//! The only state the client keeps between runs. Stored as JSON in the data
//! directory and written atomically.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

const FILE_NAME: &str = "preferences.json";

/// User preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Dark color scheme; light when false.
    #[serde(default)]
    pub dark_theme: bool,
}

/// Errors that can occur when saving preferences
#[derive(Debug, Error)]
pub enum PreferencesError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Preferences file in a data directory.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    /// Creates a store for `data_dir`. Nothing is touched until a save.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads preferences, falling back to defaults if the file is missing
    /// or unreadable.
    pub fn load(&self) -> Preferences {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences");
                return Preferences::default();
            }
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt preferences");
            Preferences::default()
        })
    }

    /// Saves preferences, creating the data directory if needed.
    pub fn save(&self, preferences: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(preferences)?;
        atomic_write(&self.path, data.as_bytes())
    }
}

/// Writes to a temp file, then renames over the target.
fn atomic_write(path: &Path, data: &[u8]) -> Result<(), PreferencesError> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_light_theme() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path());
        assert!(!store.load().dark_theme);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(&temp.path().join("nested").join("murmur"));

        store.save(&Preferences { dark_theme: true }).unwrap();

        assert!(store.load().dark_theme);
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        let store = PreferenceStore::new(temp.path());
        fs::write(store.path(), "{dark_theme: yes").unwrap();

        assert_eq!(store.load(), Preferences::default());
    }
}
