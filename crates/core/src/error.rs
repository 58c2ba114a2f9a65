// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The tagged error taxonomy shared across phases. Every crate's own
//! error enum converts into this one at the boundary the Orchestrator
//! consults, so phase drivers can branch on kind rather than on
//! crate-specific variants.

use thiserror::Error;

/// High-level error kind a caller can branch on, independent of which
/// crate raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigInvalid,
    Unreachable,
    RemoteFailure,
    TransferPartial,
    ParseFailure,
    CheckpointCorrupt,
    Cancelled,
    FleetPartial,
}

/// A fleet-wide error carrying its kind plus a human message.
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct FleetError {
    pub kind: ErrorKind,
    pub message: String,
}

impl FleetError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unreachable, message)
    }

    pub fn remote_failure(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RemoteFailure, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }
}
