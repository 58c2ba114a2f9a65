// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-remote: the Remote Execution Engine. Everything the
//! Orchestrator does to a live host -- run a command, push a file,
//! apply a playbook -- goes through the `SessionAdapter` trait here.

pub mod inventory;
pub mod session;
pub mod subprocess;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use inventory::{Inventory, InventoryHost};
pub use session::{PlaybookResult, RemoteError, SessionAdapter, SshSession};
