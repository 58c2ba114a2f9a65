// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Subprocess execution helpers shared by `ssh`, `scp`, and
//! `ansible-playbook` invocations.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Default timeout for an interactive `ssh` command (spec.md §4.A / §5).
pub const EXEC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for a single `scp` file push (spec.md §5 "transfer").
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(3600);

/// Default timeout for an `ansible-playbook` run (spec.md §5).
pub const PLAYBOOK_TIMEOUT: Duration = Duration::from_secs(3600);

/// Run a subprocess command with a timeout. The child is killed when
/// the timeout elapses, via `tokio::process::Child`'s drop glue.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, String> {
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(io_err)) => Err(format!("{} failed: {}", description, io_err)),
        Err(_elapsed) => Err(format!(
            "{} timed out after {}s",
            description,
            timeout.as_secs()
        )),
    }
}
