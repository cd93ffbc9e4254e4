//! services/api/src/adapters/storage.rs
//!
//! This module contains the local storage adapter, which is the concrete implementation
//! of the `NoteStorage` port from the `core` crate. Each key is kept as one JSON file
//! inside a data directory.

use mindinote_core::ports::{NoteStorage, PortError, PortResult};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A key-value slot store backed by one file per key.
#[derive(Clone, Debug)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    /// Creates a new `JsonFileStorage` rooted at `dir`. The directory is created on
    /// the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PortError::Storage(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

//=========================================================================================
// `NoteStorage` Trait Implementation
//=========================================================================================

impl NoteStorage for JsonFileStorage {
    fn read(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.slot_path(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// A blocking write and rename. Callers hold the store lock across it.
    fn write(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.slot_path(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            PortError::Storage(format!("failed to create {}: {}", self.dir.display(), e))
        })?;

        // Written to a sibling file, then renamed over the slot.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| PortError::Storage(format!("failed to write {}: {}", path.display(), e)))
    }
}
