// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The provisioner hook: the Orchestrator's sole collaborator for
//! turning an `InfrastructureHostSpec` into a live `Host`. spec.md §1
//! lists cloud-provider SDK wrappers as explicitly out of scope, so
//! this crate defines only the contract plus a process-based
//! implementation that shells out to an operator-supplied external
//! program -- the same "opaque external collaborator" relationship
//! `SessionAdapter::run_playbook` has with `ansible-playbook`, not a
//! cloud SDK binding.

use async_trait::async_trait;
use fleet_core::{Host, InfrastructureHostSpec};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const PROVISION_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("provisioner script failed (exit {code}): {stderr}")]
    ScriptFailed { code: i32, stderr: String },
    #[error("provisioner script output could not be parsed: {0}")]
    MalformedOutput(String),
    #[error("provisioner script could not be run: {0}")]
    Io(String),
}

/// Creates and destroys hosts by delegating to an external program.
#[async_trait]
pub trait ProvisionerHook: Send + Sync {
    async fn provision(&self, spec: &InfrastructureHostSpec) -> Result<Host, ProvisionError>;
    async fn destroy(&self, host: &Host) -> Result<(), ProvisionError>;
}

/// The shape an external provisioning script is expected to emit on
/// stdout after a successful `provision` invocation.
#[derive(Debug, Deserialize)]
struct ProvisionedHost {
    public_address: String,
    #[serde(default)]
    overlay_address: Option<String>,
    ssh_user: String,
    ssh_key_path: String,
    #[serde(default = "default_ssh_port")]
    ssh_port: u16,
}

fn default_ssh_port() -> u16 {
    22
}

/// Invokes a single external script for both `provision` and
/// `destroy`, passing the host spec as JSON on stdin and the verb as
/// the first argument -- mirroring `run_playbook`'s "external process,
/// JSON in, JSON/exit-code out" contract.
pub struct ScriptProvisioner {
    script_path: PathBuf,
}

impl ScriptProvisioner {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
        }
    }

    async fn run(&self, verb: &str, stdin_payload: &str) -> Result<Vec<u8>, ProvisionError> {
        let mut child = Command::new(&self.script_path)
            .arg(verb)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProvisionError::Io(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(stdin_payload.as_bytes())
                .await
                .map_err(|e| ProvisionError::Io(e.to_string()))?;
        }

        let output = tokio::time::timeout(PROVISION_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| ProvisionError::Io("provisioner script timed out".to_string()))?
            .map_err(|e| ProvisionError::Io(e.to_string()))?;

        if !output.status.success() {
            return Err(ProvisionError::ScriptFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(output.stdout)
    }
}

#[async_trait]
impl ProvisionerHook for ScriptProvisioner {
    async fn provision(&self, spec: &InfrastructureHostSpec) -> Result<Host, ProvisionError> {
        let payload = serde_json::to_string(spec)
            .map_err(|e| ProvisionError::MalformedOutput(e.to_string()))?;
        let stdout = self.run("provision", &payload).await?;
        let provisioned: ProvisionedHost = serde_json::from_slice(&stdout)
            .map_err(|e| ProvisionError::MalformedOutput(e.to_string()))?;

        let mut host = Host::new(&spec.name, provisioned.public_address);
        host.overlay_address = provisioned.overlay_address;
        host.ssh_user = provisioned.ssh_user;
        host.ssh_key_path = provisioned.ssh_key_path.into();
        host.ssh_port = provisioned.ssh_port;
        host.tags = spec.tags.clone();
        Ok(host)
    }

    async fn destroy(&self, host: &Host) -> Result<(), ProvisionError> {
        let payload = serde_json::to_string(&host.name)
            .map_err(|e| ProvisionError::MalformedOutput(e.to_string()))?;
        self.run("destroy", &payload).await?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeState {
        scripted: HashMap<String, Result<Host, String>>,
        destroyed: Vec<String>,
    }

    /// A scriptable `ProvisionerHook` for Orchestrator tests.
    #[derive(Clone, Default)]
    pub struct FakeProvisioner {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeProvisioner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn script_success(&self, name: &str, host: Host) {
            self.state.lock().scripted.insert(name.to_string(), Ok(host));
        }

        pub fn script_failure(&self, name: &str, message: &str) {
            self.state
                .lock()
                .scripted
                .insert(name.to_string(), Err(message.to_string()));
        }

        pub fn destroyed(&self) -> Vec<String> {
            self.state.lock().destroyed.clone()
        }
    }

    #[async_trait]
    impl ProvisionerHook for FakeProvisioner {
        async fn provision(&self, spec: &InfrastructureHostSpec) -> Result<Host, ProvisionError> {
            match self.state.lock().scripted.get(&spec.name) {
                Some(Ok(host)) => Ok(host.clone()),
                Some(Err(message)) => Err(ProvisionError::ScriptFailed {
                    code: 1,
                    stderr: message.clone(),
                }),
                None => Ok(Host::new(&spec.name, "203.0.113.99")),
            }
        }

        async fn destroy(&self, host: &Host) -> Result<(), ProvisionError> {
            self.state.lock().destroyed.push(host.name.clone());
            Ok(())
        }
    }
}
