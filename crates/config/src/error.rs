// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Config-loading error kind, grounded on the boundary-validation
//! REDESIGN FLAG: every document is parsed and validated once here,
//! surfacing a single `ConfigError` the CLI maps to exit code 2
//! (spec.md §6/§7 `ConfigInvalid`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
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
    #[error("invalid config: {0}")]
    Invalid(String),
}
