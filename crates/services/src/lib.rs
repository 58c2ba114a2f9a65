// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-services: the Service Deployers of spec.md §4.H. Each service
//! kind (Monitor, Data Collector, Freqtrade) gets an independent
//! `Deployer` implementation, resolved at runtime through a
//! `ServiceRegistry` keyed on `fleet_core::ServiceKind` -- see
//! `deployer.rs`'s module docs for why this replaces the original's
//! `BaseServiceManager` inheritance hierarchy.

pub mod collector;
pub mod deployer;
pub mod freqtrade;
pub mod monitor;
pub mod registry;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use collector::{CollectorConfig, DataCollectorDeployer};
pub use deployer::{DeployError, Deployer, HealthReport, HealthState};
pub use freqtrade::{FreqtradeConfig, FreqtradeDeployer};
pub use monitor::{MonitorConfig, MonitorDeployer};
pub use registry::ServiceRegistry;
