// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Per-profile sync checkpoint, grounded on
//! `original_source/core/data_lake/checkpoint.py::create_checkpoint_data`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one sync cycle. `Partial` is the Open Question #3
/// resolution: a transfer that moved some but not all files records
/// `Partial` rather than being folded into `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Success,
    Failed,
    Partial,
}

/// The durable, atomically-written record the Data-Lake Coordinator
/// consults before a profile's next cycle and persists after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    pub profile: String,
    pub last_sync_time: DateTime<Utc>,
    pub last_sync_status: SyncStatus,
    pub files_transferred: u64,
    pub bytes_transferred: u64,
    pub duration_seconds: f64,
    #[serde(default)]
    pub errors: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Build the checkpoint to persist after a sync cycle completes
    /// (successfully or not), timestamping `saved_at` from `now`.
    pub fn from_result(profile: &str, result: &SyncResult, now: DateTime<Utc>) -> Self {
        Self {
            profile: profile.to_string(),
            last_sync_time: now,
            last_sync_status: result.status(),
            files_transferred: result.files_transferred,
            bytes_transferred: result.bytes_transferred,
            duration_seconds: result.duration_seconds,
            errors: result.errors.clone(),
            saved_at: now,
        }
    }
}

/// The transient outcome of one rsync invocation, before it is folded
/// into a `Checkpoint`. Produced by the Transfer Driver, consumed by
/// the Coordinator and the Stats Aggregator.
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    pub success: bool,
    pub partial: bool,
    pub files_transferred: u64,
    pub bytes_transferred: u64,
    pub duration_seconds: f64,
    pub errors: Vec<String>,
}

impl SyncResult {
    pub fn status(&self) -> SyncStatus {
        if self.success {
            SyncStatus::Success
        } else if self.partial {
            SyncStatus::Partial
        } else {
            SyncStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn partial_result_maps_to_partial_status_not_failed() {
        let result = SyncResult {
            success: false,
            partial: true,
            files_transferred: 3,
            bytes_transferred: 1024,
            duration_seconds: 2.5,
            errors: vec!["connection reset after file 3".to_string()],
        };
        assert_eq!(result.status(), SyncStatus::Partial);
    }

    #[test]
    fn failed_result_without_partial_flag_maps_to_failed() {
        let result = SyncResult {
            success: false,
            partial: false,
            ..Default::default()
        };
        assert_eq!(result.status(), SyncStatus::Failed);
    }

    #[test]
    fn checkpoint_from_result_carries_stats_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 7, 27, 12, 0, 0).unwrap();
        let result = SyncResult {
            success: true,
            partial: false,
            files_transferred: 42,
            bytes_transferred: 9_000,
            duration_seconds: 7.1,
            errors: vec![],
        };
        let checkpoint = Checkpoint::from_result("gate-io", &result, now);
        assert_eq!(checkpoint.profile, "gate-io");
        assert_eq!(checkpoint.last_sync_status, SyncStatus::Success);
        assert_eq!(checkpoint.files_transferred, 42);
        assert_eq!(checkpoint.saved_at, now);
    }
}
