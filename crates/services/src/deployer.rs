// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The `Deployer` capability-set trait. REDESIGN FLAGS: replaces
//! `original_source/core/base_manager.py::BaseServiceManager` (an
//! abstract base class every deployer subclassed) with an independent
//! trait object per service kind, selected from `registry.rs`'s
//! `ServiceKind -> Deployer` lookup. No inheritance hierarchy.

use async_trait::async_trait;
use fleet_core::Host;
use fleet_remote::RemoteError;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("deployment step {step} failed: {message}")]
    StepFailed { step: &'static str, message: String },
    #[error("{0} does not support scaling")]
    NotSupported(&'static str),
}

/// Health status of a deployed service instance, matching the shape
/// of `BaseServiceManager.health_check`'s return dict (spec.md §4.H
/// "Health-check").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    /// Process/container up but an endpoint probe failed.
    Degraded,
    /// Process not up.
    Unhealthy,
    /// The health check itself errored.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct HealthReport {
    pub status: HealthState,
    pub metrics: HashMap<String, String>,
    pub message: String,
}

impl HealthReport {
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            status: HealthState::Unknown,
            metrics: HashMap::new(),
            message: message.into(),
        }
    }
}

/// One ordered sequence of remote invocations that brings a service
/// kind up on a host, plus its lifecycle operations. Each deployer
/// targets exactly one host per call (spec.md §4.H).
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Run the fixed deployment sequence of spec.md §4.H's numbered
    /// steps (1-7; steps 6/7 are optional and handled by the caller
    /// via the Security Pipeline, not by this trait).
    async fn deploy(&self, host: &Host) -> Result<(), DeployError>;

    async fn start(&self, host: &Host) -> Result<(), DeployError>;

    async fn stop(&self, host: &Host) -> Result<(), DeployError>;

    async fn health_check(&self, host: &Host) -> HealthReport;

    async fn get_logs(&self, host: &Host, lines: u32) -> Result<String, DeployError>;

    /// Scale the number of running instances. Most deployers do not
    /// support this; overriding it is opt-in, matching
    /// `BaseServiceManager.scale`'s default `NotImplementedError`.
    async fn scale(&self, _host: &Host, _count: u32) -> Result<(), DeployError> {
        Err(DeployError::NotSupported(self.kind_name()))
    }

    fn kind_name(&self) -> &'static str;
}
