// SPDX-License-Identifier: MPL-2.0
//! Preference store adapters.
//!
//! [`FilePreferenceStore`] keeps preferences in a CBOR file, separate from the
//! user-editable `settings.toml`. [`MemoryPreferenceStore`] keeps them for the
//! lifetime of the value only.
//!
//! # Path Resolution
//!
//! 1. Explicit path via [`FilePreferenceStore::at_path`] or base directory via
//!    [`FilePreferenceStore::open_in`]
//! 2. `PAGE_L10N_DATA_DIR` environment variable (if set)
//! 3. Platform-specific data directory

use crate::error::{Error, Result};
use crate::paths;
use crate::port::PreferenceStore;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Preferences file name within the app data directory.
const PREFERENCES_FILE: &str = "preferences.cbor";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
struct PreferenceFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// Preferences persisted to `preferences.cbor`.
///
/// The whole file is read once when the store is opened and rewritten on
/// every [`set`](PreferenceStore::set).
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: Option<PathBuf>,
    file: PreferenceFile,
}

impl FilePreferenceStore {
    /// Opens the store in the default data directory.
    ///
    /// Returns a tuple of (store, optional_warning). An unreadable file
    /// yields an empty store and a warning key.
    pub fn open() -> (Self, Option<String>) {
        Self::open_in(None)
    }

    /// Opens the store in a custom data directory.
    pub fn open_in(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let path = paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(PREFERENCES_FILE);
            path
        });
        match path {
            Some(path) => Self::at_path(path),
            None => (
                Self {
                    path: None,
                    file: PreferenceFile::default(),
                },
                Some("notification-preferences-path-error".to_string()),
            ),
        }
    }

    /// Opens the store backed by an explicit file.
    pub fn at_path(path: impl Into<PathBuf>) -> (Self, Option<String>) {
        let path = path.into();
        let (file, warning) = match read_file(&path) {
            Ok(file) => (file, None),
            Err(error) => {
                tracing::warn!("failed to read {}: {}", path.display(), error);
                (
                    PreferenceFile::default(),
                    Some("notification-preferences-load-error".to_string()),
                )
            }
        };
        (
            Self {
                path: Some(path),
                file,
            },
            warning,
        )
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn write(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Err(Error::Preferences(
                "no data directory available".to_string(),
            ));
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(fs::File::create(path)?);
        ciborium::into_writer(&self.file, &mut writer)
            .map_err(|e| Error::Preferences(e.to_string()))?;
        writer.flush()?;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<PreferenceFile> {
    if !path.exists() {
        return Ok(PreferenceFile::default());
    }
    let reader = BufReader::new(fs::File::open(path)?);
    ciborium::from_reader(reader).map_err(|e| Error::Preferences(e.to_string()))
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.file.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.file
            .entries
            .insert(key.to_string(), value.to_string());
        self.write()
    }
}

/// Preferences held in memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPreferenceStore {
    entries: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
