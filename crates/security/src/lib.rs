// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-security: the Security Pipeline, a 7-step marker-guarded
//! hardening state machine on a single host. Grounded on
//! `original_source/core/security_manager.py::SecurityManager`.

pub mod cooldown;
pub mod pipeline;
pub mod rules;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use cooldown::{Cooldown, Sleeper, TokioSleeper, POST_STEP3_COOLDOWN};
pub use pipeline::{PipelineError, SecurityPipeline, SecurityReport, SecurityStep, StepOutcome};
pub use rules::{RulesProfile, RulesProfileError};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeSleeper;
