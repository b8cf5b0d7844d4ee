//! Whole-registry snapshots
//!
//! A snapshot is a [`MemoryStore`] frozen into bytes or text, used for
//! backups and for moving a registry between store backends.

use crate::error::{Error, Result};
use crate::store::MemoryStore;
use std::fs;
use std::path::Path;

/// Snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Compact binary (bincode)
    Binary,
    /// Pretty-printed RON
    Ron,
}

impl SnapshotFormat {
    /// Pick a format from a file extension, defaulting to binary
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ron") => SnapshotFormat::Ron,
            _ => SnapshotFormat::Binary,
        }
    }
}

impl MemoryStore {
    /// Encode every table and counter
    pub fn to_snapshot(&self, format: SnapshotFormat) -> Result<Vec<u8>> {
        match format {
            SnapshotFormat::Binary => {
                bincode::serialize(self).map_err(|e| Error::Serialization(e.to_string()))
            }
            SnapshotFormat::Ron => {
                ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                    .map(String::into_bytes)
                    .map_err(|e| Error::Serialization(e.to_string()))
            }
        }
    }

    /// Decode a snapshot produced by [`MemoryStore::to_snapshot`]
    ///
    /// The decoded tables must pass [`MemoryStore::check_consistency`], so a
    /// hand-edited backup cannot rewind a counter below a live ID.
    pub fn from_snapshot(bytes: &[u8], format: SnapshotFormat) -> Result<Self> {
        let store: MemoryStore = match format {
            SnapshotFormat::Binary => {
                bincode::deserialize(bytes).map_err(|e| Error::Serialization(e.to_string()))?
            }
            SnapshotFormat::Ron => {
                let text =
                    std::str::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))?;
                ron::from_str(text).map_err(|e| Error::Serialization(e.to_string()))?
            }
        };
        store.check_consistency()?;
        Ok(store)
    }

    /// Write a snapshot to a file; `.ron` files are written as RON
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_snapshot(SnapshotFormat::from_path(path))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a snapshot from a file; `.ron` files are read as RON
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Self::from_snapshot(&bytes, SnapshotFormat::from_path(path))
    }
}
