//! Black-box behavioral specifications for the `fleet` CLI.
//!
//! These invoke the built `fleet` binary directly and assert on its
//! stdout/stderr/exit code, per spec.md §6's command grammar and §8's
//! concrete scenarios. Anything that would require a live remote host
//! (SSH hardening, service deployment, rsync transfer against a real
//! source) is instead covered by the scriptable-fake unit tests inside
//! each crate -- see fleet-security, fleet-services, and
//! fleet-datalake's own `#[cfg(test)]` modules.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli_help.rs"]
mod cli_help;
#[path = "specs/cli_errors.rs"]
mod cli_errors;
#[path = "specs/deploy_environment_dry_run.rs"]
mod deploy_environment_dry_run;
#[path = "specs/infra_lifecycle.rs"]
mod infra_lifecycle;
#[path = "specs/data_lake_validate.rs"]
mod data_lake_validate;
#[path = "specs/data_lake_cleanup.rs"]
mod data_lake_cleanup;
