// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet data-lake` -- sync, inspect, and clean up data-lake profiles
//! (spec.md §4.C-G). Unlike the other command modules, this one never
//! touches the provisioner hook: a profile's `source` fully describes
//! how to reach it, independent of the Environment Spec's
//! infrastructure list.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_core::{Host, Profile, SystemClock};
use fleet_datalake::{coordinator, DataLakeCoordinator, RetentionGc, RsyncTransfer};
use fleet_remote::{SessionAdapter, SshSession};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct DataLakeArgs {
    #[command(subcommand)]
    command: DataLakeCommand,
}

#[derive(Subcommand)]
enum DataLakeCommand {
    /// Run one sync cycle for PROFILE, or every enabled profile with
    /// `--all` (spec.md §4.G).
    Sync {
        profile: Option<String>,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        config: PathBuf,
        /// Compute and report the cycle without mutating anything:
        /// no directory is created or removed, no checkpoint is
        /// written (spec.md §8).
        #[arg(long)]
        dry_run: bool,
    },
    /// Print size, file/dir counts, date range, and last-sync status
    /// for PROFILE, or every profile with `--all` (spec.md §4.F).
    Stats {
        profile: Option<String>,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        config: PathBuf,
    },
    /// Run retention GC for PROFILE, or every enabled profile with
    /// `--all` (spec.md §4.D).
    Cleanup {
        profile: Option<String>,
        #[arg(long)]
        all: bool,
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Parse and validate the data-lake config document without
    /// touching any host or the local filesystem.
    Validate {
        #[arg(long)]
        config: PathBuf,
    },
    /// Check SSH reachability of PROFILE's source host.
    TestConnection {
        profile: String,
        #[arg(long)]
        config: PathBuf,
    },
}

pub async fn handle(args: DataLakeArgs) -> Result<()> {
    match args.command {
        DataLakeCommand::Sync { profile, all, config, dry_run } => sync(profile, all, config, dry_run).await,
        DataLakeCommand::Stats { profile, all, config } => stats(profile, all, config),
        DataLakeCommand::Cleanup { profile, all, config, dry_run } => cleanup(profile, all, config, dry_run),
        DataLakeCommand::Validate { config } => validate(config),
        DataLakeCommand::TestConnection { profile, config } => test_connection(profile, config).await,
    }
}

fn load(config: &PathBuf) -> Result<fleet_config::datalake::DataLakeConfig> {
    fleet_config::datalake::load(config).map_err(|e| ExitError::bad_args(e.to_string()))
}

/// Resolve `--all` vs a single PROFILE argument against the loaded
/// config's profile map, in spec order (`BTreeMap`-free `HashMap`, so
/// sort for deterministic CLI output).
fn select_profiles<'a>(
    dl: &'a fleet_config::datalake::DataLakeConfig,
    profile: Option<&str>,
    all: bool,
) -> Result<Vec<&'a Profile>> {
    if all {
        let mut profiles: Vec<&Profile> = dl.profiles.values().collect();
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        return Ok(profiles);
    }
    let name = profile.ok_or_else(|| ExitError::bad_args("specify a PROFILE name or pass --all"))?;
    let profile = dl
        .profiles
        .get(name)
        .ok_or_else(|| ExitError::bad_args(format!("no data-lake profile named '{name}'")))?;
    Ok(vec![profile])
}

async fn sync(profile: Option<String>, all: bool, config: PathBuf, dry_run: bool) -> Result<()> {
    let dl = load(&config)?;
    let profiles: Vec<Profile> = select_profiles(&dl, profile.as_deref(), all)?
        .into_iter()
        .cloned()
        .collect();

    let coordinator = DataLakeCoordinator::new(dl.root_dir.clone(), RsyncTransfer::new(), SystemClock);
    let outcomes = coordinator.sync_all(&profiles, dry_run).await;

    let mut all_ok = true;
    for outcome in &outcomes {
        if outcome.status != fleet_core::SyncStatus::Success {
            all_ok = false;
        }
        println!(
            "{:<16} {:?}  files={}  bytes={}  duration={:.1}s  retention_deleted_dirs={} retention_deleted_files={} retention_freed_bytes={}",
            outcome.profile_name,
            outcome.status,
            outcome.files_transferred,
            outcome.bytes_transferred,
            outcome.duration_seconds,
            outcome.retention_deleted_dirs,
            outcome.retention_deleted_files,
            outcome.retention_freed_bytes,
        );
    }

    if all_ok {
        Ok(())
    } else {
        Err(ExitError::generic("one or more data-lake profiles failed to sync"))
    }
}

fn stats(profile: Option<String>, all: bool, config: PathBuf) -> Result<()> {
    let dl = load(&config)?;
    let profiles = select_profiles(&dl, profile.as_deref(), all)?;

    let coordinator = DataLakeCoordinator::new(dl.root_dir.clone(), RsyncTransfer::new(), SystemClock);
    for profile in profiles {
        let stats = coordinator
            .stats_for(profile)
            .map_err(|e| ExitError::generic(e.to_string()))?;
        println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Ok(())
}

fn cleanup(profile: Option<String>, all: bool, config: PathBuf, dry_run: bool) -> Result<()> {
    let dl = load(&config)?;
    let profiles = select_profiles(&dl, profile.as_deref(), all)?;

    for profile in profiles {
        let local_path = coordinator::local_path_for(&dl.root_dir, profile);
        let gc = RetentionGc::new(SystemClock);
        let result = if dry_run {
            gc.collect(&local_path, profile.retention_days)
        } else {
            gc.run(&local_path, profile.retention_days)
                .map_err(|e| ExitError::generic(format!("retention GC failed for '{}': {e}", profile.name)))?
        };
        println!(
            "{:<16} deleted_dirs={} deleted_files={} freed_bytes={} deleted_paths={:?}",
            profile.name, result.deleted_dirs, result.deleted_files, result.freed_bytes, result.deleted_paths
        );
    }
    Ok(())
}

fn validate(config: PathBuf) -> Result<()> {
    let dl = load(&config)?;
    println!(
        "ok: {} profile(s) under root '{}'",
        dl.profiles.len(),
        dl.root_dir.display()
    );
    Ok(())
}

async fn test_connection(profile: String, config: PathBuf) -> Result<()> {
    let dl = load(&config)?;
    let profile = dl
        .profiles
        .get(&profile)
        .ok_or_else(|| ExitError::bad_args(format!("no data-lake profile named '{profile}'")))?;

    let mut host = Host::new(&profile.name, &profile.source.host);
    host.ssh_user = profile.source.user.clone();
    host.ssh_key_path = PathBuf::from(&profile.source.ssh_key);
    host.ssh_port = profile.source.port;

    let adapter = SshSession::new();
    if adapter.is_reachable(&host).await {
        println!("{}: reachable", profile.name);
        Ok(())
    } else {
        Err(ExitError::generic(format!("{}: unreachable", profile.name)))
    }
}
