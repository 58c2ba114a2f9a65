// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! A scriptable `SessionAdapter` for tests of everything downstream
//! (Security Pipeline, Service Deployers, Orchestrator) that would
//! otherwise need a live host.

use async_trait::async_trait;
use fleet_core::Host;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::session::{PlaybookResult, RemoteError, SessionAdapter};

/// One recorded call, for assertions on ordering and arguments.
#[derive(Debug, Clone)]
pub enum SessionCall {
    Exec { host: String, command: String },
    Put { host: String, remote_path: String },
    RunPlaybook { host: String, playbook: String },
}

#[derive(Default)]
struct FakeState {
    calls: Vec<SessionCall>,
    exec_responses: HashMap<String, Result<(i32, String, String), String>>,
    unreachable_hosts: std::collections::HashSet<String>,
}

/// A fake `SessionAdapter` whose responses are scripted per-host-name
/// by the test before use.
#[derive(Clone, Default)]
pub struct FakeSessionAdapter {
    state: Arc<Mutex<FakeState>>,
}

impl FakeSessionAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response `exec` returns for commands against `host`.
    pub fn set_exec_response(&self, host: &str, code: i32, stdout: &str, stderr: &str) {
        self.state.lock().exec_responses.insert(
            host.to_string(),
            Ok((code, stdout.to_string(), stderr.to_string())),
        );
    }

    pub fn mark_unreachable(&self, host: &str) {
        self.state.lock().unreachable_hosts.insert(host.to_string());
    }

    pub fn calls(&self) -> Vec<SessionCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl SessionAdapter for FakeSessionAdapter {
    async fn exec(&self, host: &Host, command: &str) -> Result<(i32, String, String), RemoteError> {
        let mut state = self.state.lock();
        if state.unreachable_hosts.contains(&host.name) {
            return Err(RemoteError::Unreachable(host.name.clone()));
        }
        state.calls.push(SessionCall::Exec {
            host: host.name.clone(),
            command: command.to_string(),
        });
        match state.exec_responses.get(&host.name) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(RemoteError::CommandFailed {
                code: 1,
                stderr: message.clone(),
            }),
            None => Ok((0, String::new(), String::new())),
        }
    }

    async fn put(
        &self,
        host: &Host,
        _local_path: &Path,
        remote_path: &str,
    ) -> Result<(), RemoteError> {
        if self.state.lock().unreachable_hosts.contains(&host.name) {
            return Err(RemoteError::TransferFailed(host.name.clone()));
        }
        self.state.lock().calls.push(SessionCall::Put {
            host: host.name.clone(),
            remote_path: remote_path.to_string(),
        });
        Ok(())
    }

    async fn run_playbook(
        &self,
        host: &Host,
        _ssh_port: u16,
        playbook_path: &Path,
        _extra_vars: &HashMap<String, serde_json::Value>,
    ) -> Result<PlaybookResult, RemoteError> {
        if self.state.lock().unreachable_hosts.contains(&host.name) {
            return Err(RemoteError::PlaybookFailed(host.name.clone()));
        }
        self.state.lock().calls.push(SessionCall::RunPlaybook {
            host: host.name.clone(),
            playbook: playbook_name(playbook_path),
        });
        Ok(PlaybookResult {
            return_code: 0,
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn playbook_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}
