// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Atomic checkpoint persistence: write to `<file>.tmp`, then rename.
//! Grounded structurally on the teacher's
//! `oj-storage::checkpoint::CheckpointWriter` trait split (tmp write,
//! then atomic rename) but without its zstd compression or fsync
//! thread, since a checkpoint here is a few hundred bytes of JSON, not
//! a multi-megabyte state snapshot -- reimplemented directly against
//! `original_source/core/data_lake/checkpoint.py`'s plain
//! `json.dump` + `Path.replace` round trip.

use fleet_core::Checkpoint;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointStoreError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt checkpoint at {path}: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads and atomically saves per-profile checkpoints.
#[derive(Debug, Clone, Default)]
pub struct CheckpointStore;

impl CheckpointStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a checkpoint. A missing file is not an error -- it means
    /// "never synced" -- and returns `Ok(None)`, matching
    /// `CheckpointManager.load_checkpoint`'s empty-dict-on-missing
    /// behavior.
    pub fn load(&self, path: &Path) -> Result<Option<Checkpoint>, CheckpointStoreError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|source| CheckpointStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let checkpoint: Checkpoint =
            serde_json::from_str(&raw).map_err(|source| CheckpointStoreError::Corrupt {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Some(checkpoint))
    }

    /// Persist a checkpoint by writing `<file>.tmp` and renaming it
    /// over the target path.
    pub fn save(&self, path: &Path, checkpoint: &Checkpoint) -> Result<(), CheckpointStoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CheckpointStoreError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let tmp_path = path.with_extension("tmp");
        let serialized =
            serde_json::to_string_pretty(checkpoint).map_err(|source| CheckpointStoreError::Corrupt {
                path: path.display().to_string(),
                source,
            })?;
        std::fs::write(&tmp_path, serialized).map_err(|source| CheckpointStoreError::Io {
            path: tmp_path.display().to_string(),
            source,
        })?;
        std::fs::rename(&tmp_path, path).map_err(|source| CheckpointStoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fleet_core::SyncStatus;
    use tempfile::tempdir;

    fn sample_checkpoint() -> Checkpoint {
        Checkpoint {
            profile: "gate-io".to_string(),
            last_sync_time: Utc::now(),
            last_sync_status: SyncStatus::Success,
            files_transferred: 10,
            bytes_transferred: 2048,
            duration_seconds: 1.5,
            errors: vec![],
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempdir().expect("tempdir");
        let store = CheckpointStore::new();
        let result = store.load(&dir.path().join("absent.json")).expect("load");
        assert!(result.is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("gate-io.json");
        let store = CheckpointStore::new();
        let checkpoint = sample_checkpoint();
        store.save(&path, &checkpoint).expect("save");
        assert!(!path.with_extension("tmp").exists());
        let loaded = store.load(&path).expect("load").expect("present");
        assert_eq!(loaded.profile, "gate-io");
        assert_eq!(loaded.files_transferred, 10);
    }

    #[test]
    fn corrupt_file_is_reported_not_silently_empty() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("gate-io.json");
        std::fs::write(&path, "{ not json").expect("write");
        let store = CheckpointStore::new();
        assert!(store.load(&path).is_err());
    }
}
