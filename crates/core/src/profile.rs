// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Data-lake Profile: a named source -> local-path replication job.
//! Field-for-field grounded on
//! `original_source/core/schemas/data_lake_schema.py`
//! (`SourceConfig`, `ProfileConfig`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A remote data source, reached over SSH.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Always "ssh" -- the sole recognized source type (spec.md §6).
    #[serde(rename = "type")]
    pub source_type: String,
    pub host: String,
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    pub user: String,
    #[serde(default = "default_ssh_key")]
    pub ssh_key: String,
    pub remote_root: String,
}

fn default_ssh_port() -> u16 {
    6677
}

fn default_ssh_key() -> String {
    "~/.ssh/id_ed25519".to_string()
}

/// Immutable once loaded; consumed by the Data-Lake Coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub source: SourceDescriptor,
    pub local_subdir: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_rsync_args")]
    pub rsync_args: String,
    pub checkpoint_file: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> u32 {
    30
}

fn default_rsync_args() -> String {
    "-az --partial --inplace".to_string()
}

impl Profile {
    /// Validation rules from spec.md §6: `retention_days > 0`,
    /// `local_subdir` non-empty and `..`-free, `type == "ssh"`.
    pub fn validate(&self) -> Result<(), String> {
        if self.retention_days == 0 {
            return Err(format!(
                "profile {}: retention_days must be > 0",
                self.name
            ));
        }
        if self.local_subdir.is_empty() || self.local_subdir.contains("..") {
            return Err(format!(
                "profile {}: local_subdir must be non-empty and free of '..'",
                self.name
            ));
        }
        if self.source.source_type != "ssh" {
            return Err(format!(
                "profile {}: source.type must be 'ssh', got '{}'",
                self.name, self.source.source_type
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> Profile {
        Profile {
            name: "gate-io".to_string(),
            enabled: true,
            source: SourceDescriptor {
                source_type: "ssh".to_string(),
                host: "10.0.0.5".to_string(),
                port: 6677,
                user: "ubuntu".to_string(),
                ssh_key: "~/.ssh/id_ed25519".to_string(),
                remote_root: "/data/ticks".to_string(),
            },
            local_subdir: "gate_io".to_string(),
            retention_days: 30,
            rsync_args: "-az --partial --inplace".to_string(),
            checkpoint_file: "/data/lake/.checkpoints/gate-io.json".into(),
        }
    }

    #[test]
    fn rejects_zero_retention() {
        let mut p = sample_profile();
        p.retention_days = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_dotdot_subdir() {
        let mut p = sample_profile();
        p.local_subdir = "../escape".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_non_ssh_source() {
        let mut p = sample_profile();
        p.source.source_type = "s3".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn accepts_well_formed_profile() {
        assert!(sample_profile().validate().is_ok());
    }
}
