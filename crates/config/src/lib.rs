// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fleet-config: loads and validates the two YAML documents of
//! spec.md §6 (Environment, Data lake) into the strongly-typed records
//! of `fleet-core`, per the REDESIGN FLAGS directive to validate once
//! at the boundary rather than threading dynamic config dicts through
//! every constructor. Security-rules-profile loading lives in
//! `fleet-security::rules` instead (see that crate's module docs) --
//! it is intrinsic to the Security Pipeline's step 2/6 behavior, not a
//! top-level document shape.

pub mod datalake;
pub mod environment;
pub mod error;

pub use datalake::DataLakeConfig;
pub use error::ConfigError;
