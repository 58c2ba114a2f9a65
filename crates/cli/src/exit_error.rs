// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Maps a command's outcome to a process exit code (spec.md §6: 0
//! success, 1 generic failure, 2 bad arguments/missing required
//! fields). Wrapped in an `anyhow::Error` so `main` can downcast it
//! out of any `?`-propagated chain without every command needing to
//! know about `std::process::exit`.

use std::fmt;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
}

impl ExitError {
    pub fn bad_args(message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(Self { code: 2 }).context(message.into())
    }

    pub fn generic(message: impl Into<String>) -> anyhow::Error {
        anyhow::Error::new(Self { code: 1 }).context(message.into())
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit code {}", self.code)
    }
}

impl std::error::Error for ExitError {}

/// The code to exit with for any error anyhow's `main` sees: an
/// explicit `ExitError` downcast, or 1 for everything else.
pub fn code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ExitError>())
        .map_or(1, |e| e.code)
}
