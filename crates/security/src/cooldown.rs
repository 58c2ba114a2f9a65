// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The post-Secure.3 quiet period. spec.md §4.I pins a ≥70s minimum
//! (Open Question #2 resolution), replacing the original's
//! inconsistent mix of 30s and 70s waits around the SSH hardening
//! playbook (`security_manager.py::_wait_for_instance_ready`'s extra
//! 10s plus its own 5s polling loop).

use async_trait::async_trait;
use std::time::Duration;

/// Minimum quiet period after Secure.3 before any further SSH session
/// is opened to the host, per spec.md §4.I.
pub const POST_STEP3_COOLDOWN: Duration = Duration::from_secs(70);

/// Abstracts "wait this long" so the cooldown can be exercised in
/// tests without burning 70 real seconds per run.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Enforces the minimum post-step-3 quiet period through a `Sleeper`.
pub struct Cooldown<S: Sleeper> {
    sleeper: S,
    duration: Duration,
}

impl<S: Sleeper> Cooldown<S> {
    pub fn new(sleeper: S) -> Self {
        Self {
            sleeper,
            duration: POST_STEP3_COOLDOWN,
        }
    }

    /// Override the minimum wait -- only meaningful for tests; a
    /// caller outside this crate's tests should never ask for less
    /// than `POST_STEP3_COOLDOWN`.
    #[cfg(test)]
    fn with_duration(sleeper: S, duration: Duration) -> Self {
        Self { sleeper, duration }
    }

    pub async fn wait(&self) {
        self.sleeper.sleep(self.duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingSleeper {
        slept: Arc<Mutex<Vec<Duration>>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().push(duration);
        }
    }

    #[tokio::test]
    async fn wait_requests_at_least_seventy_seconds_by_default() {
        let sleeper = RecordingSleeper::default();
        let cooldown = Cooldown::new(sleeper.clone());
        cooldown.wait().await;
        assert_eq!(sleeper.slept.lock().as_slice(), [POST_STEP3_COOLDOWN]);
    }

    #[tokio::test]
    async fn custom_duration_is_honored_for_tests() {
        let sleeper = RecordingSleeper::default();
        let cooldown = Cooldown::with_duration(sleeper.clone(), Duration::from_millis(5));
        cooldown.wait().await;
        assert_eq!(sleeper.slept.lock().as_slice(), [Duration::from_millis(5)]);
    }
}
