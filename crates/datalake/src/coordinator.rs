// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The Data-Lake Coordinator: one sync cycle per profile, grounded on
//! `original_source/core/data_lake/manager.py::DataLakeManager.sync_profile`
//! / `sync_all`. Open Question #1 resolution: `sync_all` continues
//! past a failing profile and aggregates every outcome rather than
//! stopping at the first failure.

use crate::checkpoint_store::{CheckpointStore, CheckpointStoreError};
use crate::retention::RetentionGc;
use crate::transfer::TransferDriver;
use fleet_core::{Checkpoint, Clock, Profile, SyncStatus};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("profile {0} is disabled")]
    Disabled(String),
    #[error(transparent)]
    Checkpoint(#[from] CheckpointStoreError),
}

/// Outcome of syncing one profile through a full cycle.
#[derive(Debug, Clone)]
pub struct ProfileSyncOutcome {
    pub profile_name: String,
    pub status: SyncStatus,
    pub files_transferred: u64,
    pub bytes_transferred: u64,
    pub duration_seconds: f64,
    pub retention_deleted_dirs: u64,
    pub retention_deleted_files: u64,
    pub retention_freed_bytes: u64,
}

/// Orchestrates one profile's sync -> checkpoint -> retention-GC
/// cycle, and fan-out across every enabled profile for `sync_all`.
pub struct DataLakeCoordinator<T: TransferDriver, C: Clock> {
    root_dir: PathBuf,
    transfer: T,
    checkpoint_store: CheckpointStore,
    clock: C,
}

impl<T: TransferDriver, C: Clock> DataLakeCoordinator<T, C> {
    pub fn new(root_dir: impl Into<PathBuf>, transfer: T, clock: C) -> Self {
        Self {
            root_dir: root_dir.into(),
            transfer,
            checkpoint_store: CheckpointStore::new(),
            clock,
        }
    }

    fn local_path_for(&self, profile: &Profile) -> PathBuf {
        self.root_dir.join(&profile.local_subdir)
    }

    /// Run one sync cycle for `profile`: load checkpoint (informational
    /// only -- rsync itself is what makes this incremental), run the
    /// transfer, save the checkpoint, and on success *or partial*
    /// transfer run retention GC (spec.md §7 "TransferPartial": the
    /// Coordinator records status=partial but retention GC still runs).
    ///
    /// `dry_run` computes and reports the cycle without mutating
    /// anything: no directory is created under the data-lake root, no
    /// checkpoint is written, and retention GC does not run (spec.md
    /// §8 "Data-lake sync with dry-run=true").
    pub async fn sync_profile(
        &self,
        profile: &Profile,
        dry_run: bool,
    ) -> Result<ProfileSyncOutcome, CoordinatorError> {
        if !profile.enabled {
            return Err(CoordinatorError::Disabled(profile.name.clone()));
        }

        let local_path = self.local_path_for(profile);
        // Informational: surfaces in logs/stats, but rsync's own
        // incremental transfer logic does not consult it.
        let _previous = self.checkpoint_store.load(&profile.checkpoint_file)?;

        let result = self.transfer.sync(profile, &local_path, dry_run, false).await;

        if dry_run {
            let checkpoint = Checkpoint::from_result(&profile.name, &result, self.clock.now());
            return Ok(ProfileSyncOutcome {
                profile_name: profile.name.clone(),
                status: checkpoint.last_sync_status,
                files_transferred: checkpoint.files_transferred,
                bytes_transferred: checkpoint.bytes_transferred,
                duration_seconds: checkpoint.duration_seconds,
                retention_deleted_dirs: 0,
                retention_deleted_files: 0,
                retention_freed_bytes: 0,
            });
        }

        let now = self.clock.now();
        let checkpoint = Checkpoint::from_result(&profile.name, &result, now);
        self.checkpoint_store
            .save(&profile.checkpoint_file, &checkpoint)?;

        let (retention_deleted_dirs, retention_deleted_files, retention_freed_bytes) = if result.success || result.partial {
            let gc = RetentionGc::new(self.clock.clone());
            gc.run(&local_path, profile.retention_days)
                .map(|r| (r.deleted_dirs, r.deleted_files, r.freed_bytes))
                .unwrap_or((0, 0, 0))
        } else {
            (0, 0, 0)
        };

        Ok(ProfileSyncOutcome {
            profile_name: profile.name.clone(),
            status: checkpoint.last_sync_status,
            files_transferred: checkpoint.files_transferred,
            bytes_transferred: checkpoint.bytes_transferred,
            duration_seconds: checkpoint.duration_seconds,
            retention_deleted_dirs,
            retention_deleted_files,
            retention_freed_bytes,
        })
    }

    /// Sync every enabled profile, continuing past individual
    /// failures and returning one outcome per profile (Open Question
    /// #1).
    pub async fn sync_all(&self, profiles: &[Profile], dry_run: bool) -> Vec<ProfileSyncOutcome> {
        let mut outcomes = Vec::with_capacity(profiles.len());
        for profile in profiles.iter().filter(|p| p.enabled) {
            match self.sync_profile(profile, dry_run).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => {
                    tracing::warn!(profile = %profile.name, error = %err, "profile sync failed");
                    outcomes.push(ProfileSyncOutcome {
                        profile_name: profile.name.clone(),
                        status: SyncStatus::Failed,
                        files_transferred: 0,
                        bytes_transferred: 0,
                        duration_seconds: 0.0,
                        retention_deleted_dirs: 0,
                        retention_deleted_files: 0,
                        retention_freed_bytes: 0,
                    });
                }
            }
        }
        outcomes
    }

    pub fn stats_for(
        &self,
        profile: &Profile,
    ) -> Result<crate::stats::ProfileStats, CoordinatorError> {
        let checkpoint = self.checkpoint_store.load(&profile.checkpoint_file)?;
        let local_path = self.local_path_for(profile);
        Ok(crate::stats::collect(profile, &local_path, checkpoint.as_ref()))
    }
}

/// Helper retained for callers that only need the resolved local path
/// without constructing a full coordinator (e.g. `fleet-cli`'s
/// `data-lake stats` command against an unsynced profile).
pub fn local_path_for(root_dir: &Path, profile: &Profile) -> PathBuf {
    root_dir.join(&profile.local_subdir)
}
