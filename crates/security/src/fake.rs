// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Test-support doubles for consumers of this crate that need a
//! `Sleeper` which records waits instead of blocking for real.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use crate::cooldown::Sleeper;

/// A `Sleeper` that records every requested duration instead of
/// actually waiting, so downstream crates' tests can assert a cooldown
/// was requested without burning real wall-clock time.
#[derive(Clone, Default)]
pub struct FakeSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl FakeSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_durations(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }
}

#[async_trait]
impl Sleeper for FakeSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_requested_duration_without_waiting() {
        let sleeper = FakeSleeper::new();
        sleeper.sleep(Duration::from_secs(70)).await;
        assert_eq!(sleeper.requested_durations(), vec![Duration::from_secs(70)]);
    }
}
