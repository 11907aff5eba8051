//! Persisted store for the three independent records: the settings, the
//! session list and the Chair log. Each record is one file in the data
//! directory, rewritten atomically after every mutation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::core::config::io::write_atomically;
use crate::core::config::path_display;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    Settings,
    Sessions,
    ChairLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl StoreKey {
    pub fn file_name(self) -> &'static str {
        match self {
            StoreKey::Settings => "settings.toml",
            StoreKey::Sessions => "sessions.json",
            StoreKey::ChairLog => "chair.json",
        }
    }

    fn format(self) -> Format {
        match self {
            StoreKey::Settings => Format::Toml,
            StoreKey::Sessions | StoreKey::ChairLog => Format::Json,
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Errors raised while writing a record.
#[derive(Debug)]
pub enum StoreError {
    Serialize {
        key: StoreKey,
        message: String,
    },
    Write {
        path: PathBuf,
        source: io::Error,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Serialize { key, message } => {
                write!(f, "Failed to serialize {key}: {message}")
            }
            StoreError::Write { path, source } => {
                write!(f, "Failed to write {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Serialize { .. } => None,
            StoreError::Write { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: StoreKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Load a record. A missing file is `None`; so is a file that cannot be
    /// read or no longer matches the expected shape, since there is no schema
    /// versioning to migrate from.
    pub fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let path = self.path_for(key);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(record = %key, "no stored record, using defaults");
                return None;
            }
            Err(err) => {
                warn!(record = %key, error = %err, "unreadable record, using defaults");
                return None;
            }
        };

        let parsed = match key.format() {
            Format::Toml => toml::from_str(&contents).map_err(|err| err.to_string()),
            Format::Json => serde_json::from_str(&contents).map_err(|err| err.to_string()),
        };

        match parsed {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(record = %key, error = %err, "corrupt record, using defaults");
                None
            }
        }
    }

    /// Serialize and atomically replace a record.
    pub fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> Result<(), StoreError> {
        let contents = match key.format() {
            Format::Toml => toml::to_string_pretty(value).map_err(|err| err.to_string()),
            Format::Json => serde_json::to_string_pretty(value).map_err(|err| err.to_string()),
        }
        .map_err(|message| StoreError::Serialize { key, message })?;

        let path = self.path_for(key);
        write_atomically(&path, contents.as_bytes())
            .map_err(|source| StoreError::Write { path, source })?;
        debug!(record = %key, bytes = contents.len(), "record saved");
        Ok(())
    }
}
