// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-orchestrator: spec.md §4.J, the Orchestrator. Plans and
//! executes a multi-phase Environment Spec DAG (Provision -> Secure ->
//! Service -> Summarize) by invoking the Security Pipeline
//! (`fleet-security`), Service Deployers (`fleet-services`), and an
//! external provisioner hook, over the Remote Execution Engine
//! (`fleet-remote`).

pub mod orchestrator;
pub mod phases;
pub mod plan;
pub mod provisioner;

pub use orchestrator::{Orchestrator, RunReport};
pub use phases::{HostOutcome, PhaseStatus};
pub use plan::{build_plan, Plan, PlanItem};
pub use provisioner::{ProvisionError, ProvisionerHook, ScriptProvisioner};

#[cfg(any(test, feature = "test-support"))]
pub use provisioner::fake;
#[cfg(any(test, feature = "test-support"))]
pub use provisioner::fake::FakeProvisioner;
