// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The rsync-over-SSH transfer driver. Grounded on
//! `original_source/core/data_lake/syncer.py::RsyncSyncer`: argv
//! construction, 1-hour timeout, and stdout statistics parsing.

use async_trait::async_trait;
use fleet_core::{Profile, SyncResult};
use regex::Regex;
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::process::Command;

/// rsync's own timeout, matching the original's `timeout=3600`.
const RSYNC_TIMEOUT: Duration = Duration::from_secs(3600);

/// Abstracts "run rsync and report what happened" so the Coordinator
/// can be tested without invoking a real rsync binary.
#[async_trait]
pub trait TransferDriver: Send + Sync {
    async fn sync(
        &self,
        profile: &Profile,
        local_path: &std::path::Path,
        dry_run: bool,
        verbose: bool,
    ) -> SyncResult;
}

/// Production driver: shells out to the system `rsync` over an `ssh
/// -i <key> -p <port>` transport, exactly as
/// `RsyncSyncer._build_rsync_command` does.
#[derive(Debug, Clone, Default)]
pub struct RsyncTransfer;

impl RsyncTransfer {
    pub fn new() -> Self {
        Self
    }

    fn build_command(
        profile: &Profile,
        local_path: &std::path::Path,
        dry_run: bool,
        verbose: bool,
    ) -> Command {
        let mut cmd = Command::new("rsync");
        for arg in profile.rsync_args.split_whitespace() {
            cmd.arg(arg);
        }
        if dry_run {
            cmd.arg("--dry-run");
        }
        if verbose {
            cmd.arg("--stats").arg("--verbose").arg("--progress");
        }

        let ssh_key = shellexpand_tilde(&profile.source.ssh_key);
        let ssh_cmd = format!(
            "ssh -i {} -p {} -o StrictHostKeyChecking=no",
            ssh_key, profile.source.port
        );
        cmd.arg("-e").arg(ssh_cmd);

        let mut remote_root = profile.source.remote_root.clone();
        if !remote_root.ends_with('/') {
            remote_root.push('/');
        }
        let source = format!(
            "{}@{}:{}",
            profile.source.user, profile.source.host, remote_root
        );
        cmd.arg(source);

        let mut local = local_path.display().to_string();
        if !local.ends_with('/') {
            local.push('/');
        }
        cmd.arg(local);
        cmd.stdin(Stdio::null());
        cmd
    }
}

#[async_trait]
impl TransferDriver for RsyncTransfer {
    async fn sync(
        &self,
        profile: &Profile,
        local_path: &std::path::Path,
        dry_run: bool,
        verbose: bool,
    ) -> SyncResult {
        // The Coordinator skips this (and the Retention GC and checkpoint
        // write) under dry-run, but a stray direct caller must not be able
        // to touch the filesystem through a dry-run transfer either.
        if !dry_run {
            if let Err(err) = std::fs::create_dir_all(local_path) {
                return SyncResult {
                    success: false,
                    partial: false,
                    errors: vec![format!("failed to create {}: {}", local_path.display(), err)],
                    ..Default::default()
                };
            }
        }

        let start = Instant::now();
        let mut cmd = Self::build_command(profile, local_path, dry_run, verbose);

        let output = match tokio::time::timeout(RSYNC_TIMEOUT, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(io_err)) => {
                return SyncResult {
                    success: false,
                    partial: false,
                    duration_seconds: start.elapsed().as_secs_f64(),
                    errors: vec![format!("failed to run rsync: {}", io_err)],
                    ..Default::default()
                }
            }
            Err(_elapsed) => {
                return SyncResult {
                    success: false,
                    partial: false,
                    duration_seconds: start.elapsed().as_secs_f64(),
                    errors: vec!["sync timed out after 3600s".to_string()],
                    ..Default::default()
                }
            }
        };

        let duration_seconds = start.elapsed().as_secs_f64();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let (files_transferred, bytes_transferred) = parse_rsync_stats(&stdout);

        // rsync exit codes: 0 = success, 23/24 = partial transfer.
        let exit_code = output.status.code().unwrap_or(-1);
        let success = exit_code == 0;
        let partial = exit_code == 23 || exit_code == 24;

        SyncResult {
            success,
            partial,
            files_transferred,
            bytes_transferred,
            duration_seconds,
            errors: if stderr.is_empty() { vec![] } else { vec![stderr] },
        }
    }
}

fn shellexpand_tilde(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest).display().to_string();
        }
    }
    path.to_string()
}

/// Parse `rsync --stats` output for transferred-file-count and
/// transferred-byte-count, falling back to the bare `sent N bytes`
/// line when the `--stats` block is absent.
// Allow expect here as these regexes are compile-time verified to be valid.
#[allow(clippy::expect_used)]
fn parse_rsync_stats(output: &str) -> (u64, u64) {
    static FILES_RE: OnceLock<Regex> = OnceLock::new();
    static BYTES_RE: OnceLock<Regex> = OnceLock::new();
    static SENT_RE: OnceLock<Regex> = OnceLock::new();

    let files_re = FILES_RE.get_or_init(|| {
        Regex::new(r"Number of regular files transferred:\s*([\d,]+)").expect("valid regex")
    });
    let bytes_re = BYTES_RE.get_or_init(|| {
        Regex::new(r"Total transferred file size:\s*([\d,]+)\s*bytes").expect("valid regex")
    });
    let sent_re =
        SENT_RE.get_or_init(|| Regex::new(r"sent\s+([\d,]+)\s+bytes").expect("valid regex"));

    let files = files_re
        .captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0);

    let mut bytes = bytes_re
        .captures(output)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
        .unwrap_or(0);

    if bytes == 0 {
        bytes = sent_re
            .captures(output)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().replace(',', "").parse().ok())
            .unwrap_or(0);
    }

    (files, bytes)
}
