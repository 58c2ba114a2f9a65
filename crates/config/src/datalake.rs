// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Loads the data-lake YAML document (spec.md §6 "Data lake") into a
//! `root_dir` plus a validated, checkpoint-file-filled map of
//! `fleet_core::Profile`, grounded field-for-field on
//! `original_source/core/schemas/data_lake_schema.py`
//! (`DataLakeConfig`/`RootConfig`): `root_dir` and each profile's
//! `ssh_key` are tilde-expanded, `checkpoint_dir` defaults to
//! `${root_dir}/.checkpoints`, and a profile's `checkpoint_file`
//! defaults to `${checkpoint_dir}/${name}.json` when absent.

use fleet_core::Profile;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

#[derive(Debug, Deserialize)]
struct RootDocument {
    data_lake: RawDataLakeConfig,
}

#[derive(Debug, Deserialize)]
struct RawDataLakeConfig {
    root_dir: String,
    #[serde(default)]
    checkpoint_dir: Option<String>,
    profiles: HashMap<String, RawProfile>,
}

#[derive(Debug, Deserialize)]
struct RawProfile {
    #[serde(default = "default_true")]
    enabled: bool,
    source: RawSource,
    local_subdir: String,
    #[serde(default = "default_retention_days")]
    retention_days: u32,
    #[serde(default = "default_rsync_args")]
    rsync_args: String,
    #[serde(default)]
    checkpoint_file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(rename = "type")]
    source_type: String,
    host: String,
    #[serde(default = "default_ssh_port")]
    port: u16,
    user: String,
    #[serde(default = "default_ssh_key")]
    ssh_key: String,
    remote_root: String,
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
fn default_ssh_port() -> u16 {
    6677
}
fn default_ssh_key() -> String {
    "~/.ssh/id_ed25519".to_string()
}

/// Fully resolved data-lake configuration: a local root directory and
/// every named, validated profile.
#[derive(Debug, Clone)]
pub struct DataLakeConfig {
    pub root_dir: PathBuf,
    pub checkpoint_dir: PathBuf,
    pub profiles: HashMap<String, Profile>,
}

impl DataLakeConfig {
    pub fn enabled_profiles(&self) -> Vec<&Profile> {
        self.profiles.values().filter(|p| p.enabled).collect()
    }
}

/// Parse, tilde-expand, defaults-fill, and validate a data-lake YAML
/// document.
pub fn load(path: &Path) -> Result<DataLakeConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let document: RootDocument =
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

    let root_dir = expand_tilde(&document.data_lake.root_dir);
    let checkpoint_dir = document
        .data_lake
        .checkpoint_dir
        .map(|d| expand_tilde(&d))
        .unwrap_or_else(|| root_dir.join(".checkpoints"));

    let mut profiles = HashMap::with_capacity(document.data_lake.profiles.len());
    for (name, raw_profile) in document.data_lake.profiles {
        let checkpoint_file = raw_profile
            .checkpoint_file
            .map(PathBuf::from)
            .unwrap_or_else(|| checkpoint_dir.join(format!("{name}.json")));

        let profile = Profile {
            name: name.clone(),
            enabled: raw_profile.enabled,
            source: fleet_core::profile::SourceDescriptor {
                source_type: raw_profile.source.source_type,
                host: raw_profile.source.host,
                port: raw_profile.source.port,
                user: raw_profile.source.user,
                ssh_key: expand_tilde(&raw_profile.source.ssh_key)
                    .display()
                    .to_string(),
                remote_root: raw_profile.source.remote_root,
            },
            local_subdir: raw_profile.local_subdir,
            retention_days: raw_profile.retention_days,
            rsync_args: raw_profile.rsync_args,
            checkpoint_file,
        };

        profile
            .validate()
            .map_err(ConfigError::Invalid)?;

        profiles.insert(name, profile);
    }

    Ok(DataLakeConfig {
        root_dir,
        checkpoint_dir,
        profiles,
    })
}

fn expand_tilde(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}
