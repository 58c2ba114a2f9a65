// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The `SessionAdapter` trait: every operation the rest of the system
//! performs against a live host, abstracted so the Security Pipeline,
//! Service Deployers, and tests can swap a fake implementation in.
//! Grounded on the shape (not the body) of the teacher's
//! `SessionAdapter` trait, retargeted from tmux panes to SSH exec/put
//! and from `ansible_manager.py::run_playbook`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::subprocess::{run_with_timeout, EXEC_TIMEOUT, PLAYBOOK_TIMEOUT, TRANSFER_TIMEOUT};
use fleet_core::Host;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("host unreachable: {0}")]
    Unreachable(String),
    #[error("remote command failed (exit {code}): {stderr}")]
    CommandFailed { code: i32, stderr: String },
    #[error("transfer failed: {0}")]
    TransferFailed(String),
    #[error("playbook failed: {0}")]
    PlaybookFailed(String),
    #[error("timed out: {0}")]
    TimedOut(String),
}

/// Outcome of one `ansible-playbook` invocation, mirroring
/// `ansible_manager.py::run_playbook`'s `{rc, stdout, stderr, status}`
/// result dict.
#[derive(Debug, Clone)]
pub struct PlaybookResult {
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl PlaybookResult {
    pub fn success(&self) -> bool {
        self.return_code == 0
    }
}

/// Adapter for everything the rest of the system does to a live host.
#[async_trait]
pub trait SessionAdapter: Send + Sync {
    /// Run a command over SSH, returning (exit_code, stdout, stderr).
    async fn exec(&self, host: &Host, command: &str) -> Result<(i32, String, String), RemoteError>;

    /// Push a local file to a remote path, via `scp`.
    async fn put(&self, host: &Host, local_path: &Path, remote_path: &str)
        -> Result<(), RemoteError>;

    /// Run an ansible playbook against one host, with the given
    /// `extra_vars`, using a JSON inventory generated from the host
    /// plus the given SSH port override (needed mid-Security-Pipeline
    /// when the live port has not yet been committed to `host`).
    async fn run_playbook(
        &self,
        host: &Host,
        ssh_port: u16,
        playbook_path: &Path,
        extra_vars: &HashMap<String, serde_json::Value>,
    ) -> Result<PlaybookResult, RemoteError>;

    /// Probe reachability: true if `exec("true")` succeeds within a
    /// short timeout.
    async fn is_reachable(&self, host: &Host) -> bool {
        self.exec(host, "true").await.is_ok()
    }
}

/// The production adapter: shells out to the system's `ssh`, `scp`,
/// and `ansible-playbook` binaries.
#[derive(Debug, Clone, Default)]
pub struct SshSession;

impl SshSession {
    pub fn new() -> Self {
        Self
    }

    fn ssh_common_args(host: &Host) -> Vec<String> {
        vec![
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "UserKnownHostsFile=/dev/null".to_string(),
            "-i".to_string(),
            host.ssh_key_path.display().to_string(),
            "-p".to_string(),
            host.ssh_port.to_string(),
        ]
    }
}

#[async_trait]
impl SessionAdapter for SshSession {
    async fn exec(&self, host: &Host, command: &str) -> Result<(i32, String, String), RemoteError> {
        let mut cmd = Command::new("ssh");
        cmd.args(Self::ssh_common_args(host))
            .arg(format!("{}@{}", host.ssh_user, host.public_address))
            .arg(command)
            .stdin(Stdio::null());

        let output = run_with_timeout(cmd, EXEC_TIMEOUT, "ssh exec")
            .await
            .map_err(RemoteError::Unreachable)?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Ok((code, stdout, stderr))
    }

    async fn put(
        &self,
        host: &Host,
        local_path: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteError> {
        let mut cmd = Command::new("scp");
        cmd.args([
            "-o",
            "StrictHostKeyChecking=no",
            "-o",
            "UserKnownHostsFile=/dev/null",
            "-i",
            &host.ssh_key_path.display().to_string(),
            "-P",
            &host.ssh_port.to_string(),
        ])
        .arg(local_path)
        .arg(format!(
            "{}@{}:{}",
            host.ssh_user, host.public_address, remote_path
        ));

        let output = run_with_timeout(cmd, TRANSFER_TIMEOUT, "scp put")
            .await
            .map_err(RemoteError::TransferFailed)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(RemoteError::TransferFailed(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ))
        }
    }

    async fn run_playbook(
        &self,
        host: &Host,
        ssh_port: u16,
        playbook_path: &Path,
        extra_vars: &HashMap<String, serde_json::Value>,
    ) -> Result<PlaybookResult, RemoteError> {
        let inventory = crate::inventory::Inventory::single_target(host, ssh_port);
        let tmp_dir = tempfile_inventory_dir()?;
        let inventory_path = tmp_dir.join("inventory.json");
        std::fs::write(
            &inventory_path,
            serde_json::to_string_pretty(&inventory)
                .map_err(|e| RemoteError::PlaybookFailed(e.to_string()))?,
        )
        .map_err(|e| RemoteError::PlaybookFailed(e.to_string()))?;

        let mut cmd = Command::new("ansible-playbook");
        cmd.arg("-i").arg(&inventory_path).arg(playbook_path);

        if !extra_vars.is_empty() {
            let vars_json = serde_json::to_string(extra_vars)
                .map_err(|e| RemoteError::PlaybookFailed(e.to_string()))?;
            cmd.arg("--extra-vars").arg(vars_json);
        }

        let output = run_with_timeout(cmd, PLAYBOOK_TIMEOUT, "ansible-playbook")
            .await
            .map_err(RemoteError::PlaybookFailed)?;

        Ok(PlaybookResult {
            return_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

fn tempfile_inventory_dir() -> Result<std::path::PathBuf, RemoteError> {
    let dir = std::env::temp_dir().join(format!("fleet-playbook-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).map_err(|e| RemoteError::PlaybookFailed(e.to_string()))?;
    Ok(dir)
}

/// Minimum interval between reachability probes during a Provision
/// phase reachability poll (spec.md §4.A edge cases).
pub const REACHABILITY_POLL_INTERVAL: Duration = Duration::from_secs(3);
