// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Per-profile firewall rules, grounded on
//! `original_source/core/security_manager.py::_load_security_rules`:
//! filename normalization (`-` -> `_`), the `NAME.yml` / `NAME_rules.yml`
//! fallback search, and a missing file being a hard error rather than
//! a silent default (spec.md §4.I "Rules files").

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesProfileError {
    #[error("security rules profile not found: tried {tried:?}")]
    NotFound { tried: Vec<PathBuf> },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

fn default_protocol() -> String {
    "tcp".to_string()
}

/// One `{port, protocol}` entry of a rules file's port lists
/// (spec.md §6 config format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRule {
    pub port: u16,
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

/// The recognized keys of a security rules file (spec.md §4.I).
/// `ssh_port` is honored at step 2 (firewall base) and ignored at
/// step 6 (service firewall adjust), where the host's live port
/// always wins instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesProfile {
    #[serde(default)]
    pub ssh_port: Option<u16>,
    #[serde(default)]
    pub vpn_only_ports: Vec<PortRule>,
    #[serde(default)]
    pub public_ports: Vec<PortRule>,
}

impl RulesProfile {
    /// Load a named profile from `config_dir`, trying `{name}.yml`
    /// then `{name}_rules.yml` then, if `name` itself ends in
    /// `_rules`, the base name without that suffix -- exactly the
    /// original's three-way fallback.
    pub fn load(config_dir: &Path, name: &str) -> Result<Self, RulesProfileError> {
        let slug = name.replace('-', "_");
        let mut tried = Vec::new();

        let direct = config_dir.join(format!("{slug}.yml"));
        tried.push(direct.clone());
        if direct.exists() {
            return Self::read(&direct);
        }

        let with_suffix = config_dir.join(format!("{slug}_rules.yml"));
        tried.push(with_suffix.clone());
        if with_suffix.exists() {
            return Self::read(&with_suffix);
        }

        if let Some(base) = slug.strip_suffix("_rules") {
            let base_path = config_dir.join(format!("{base}.yml"));
            tried.push(base_path.clone());
            if base_path.exists() {
                return Self::read(&base_path);
            }
        }

        Err(RulesProfileError::NotFound { tried })
    }

    fn read(path: &Path) -> Result<Self, RulesProfileError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RulesProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| RulesProfileError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
