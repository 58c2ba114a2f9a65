// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Shared plumbing every command module needs: config loading, host
//! resolution through the provisioner hook, and the per-service-kind
//! deployer configs carried in a Service Work Item's `config` map.

use std::path::PathBuf;

use anyhow::{Context, Result};
use fleet_core::env_spec::{EnvironmentSpec, ServiceKind, ServiceWorkItem};
use fleet_core::Host;
use fleet_orchestrator::{ProvisionerHook, ScriptProvisioner};
use fleet_remote::SshSession;
use fleet_security::{Cooldown, SecurityPipeline, TokioSleeper};
use fleet_services::{CollectorConfig, FreqtradeConfig, MonitorConfig};
use serde::Deserialize;

use crate::exit_error::ExitError;

/// Infrastructure/security/service plumbing paths shared by every
/// subcommand that talks to a live host. Global because they describe
/// the deployment environment, not any one Environment Spec.
#[derive(Debug, Clone, clap::Args)]
pub struct RemoteArgs {
    /// Directory containing the ansible playbooks the Security
    /// Pipeline and Service Deployers invoke.
    #[arg(long, global = true, default_value = "/opt/fleet/playbooks")]
    pub playbook_dir: PathBuf,

    /// Directory containing per-service-kind security rules profiles.
    #[arg(long, global = true, default_value = "/opt/fleet/security-rules")]
    pub rules_dir: PathBuf,

    /// External program that turns an infrastructure host spec into a
    /// live host (provision) or tears one down (destroy). Never a
    /// cloud-SDK binding itself -- see fleet-orchestrator's
    /// `ScriptProvisioner`.
    #[arg(long, global = true, default_value = "/opt/fleet/bin/fleet-provisioner")]
    pub provisioner_script: PathBuf,
}

impl RemoteArgs {
    pub fn adapter(&self) -> SshSession {
        SshSession::new()
    }

    pub fn provisioner(&self) -> ScriptProvisioner {
        ScriptProvisioner::new(&self.provisioner_script)
    }

    pub fn pipeline(&self, adapter: SshSession) -> SecurityPipeline<SshSession> {
        SecurityPipeline::new(adapter, &self.playbook_dir, &self.rules_dir)
    }

    pub fn cooldown(&self) -> Cooldown<TokioSleeper> {
        Cooldown::new(TokioSleeper)
    }
}

pub fn load_environment(path: &std::path::Path) -> Result<EnvironmentSpec> {
    fleet_config::environment::load(path).map_err(|e| ExitError::bad_args(e.to_string()))
}

/// Resolve a logical host name to a live `Host`, via the provisioner
/// hook. Provisioning is idempotent (spec.md §4.J) so re-running this
/// against an already-provisioned host is safe and simply returns its
/// current connection info -- the standalone `security`/`monitor`/
/// `data-collector`/`freqtrade` commands have no other way to learn a
/// host's live address between `deploy-environment` runs.
pub async fn resolve_host(
    provisioner: &ScriptProvisioner,
    spec: &EnvironmentSpec,
    name: &str,
) -> Result<Host> {
    let host_spec = spec
        .find_infrastructure_host(name)
        .ok_or_else(|| ExitError::bad_args(format!("no infrastructure host named '{name}'")))?;
    provisioner
        .provision(host_spec)
        .await
        .map_err(|e| ExitError::generic(e.to_string()))
        .context("resolving host through the provisioner hook")
}

/// Find the `ServiceWorkItem` of a given kind targeting `name`, if the
/// Environment Spec declares one.
pub fn find_service_item<'a>(
    spec: &'a EnvironmentSpec,
    kind: ServiceKind,
    name: &str,
) -> Option<&'a ServiceWorkItem> {
    spec.services
        .iter()
        .find(|item| item.kind == kind && item.target == name)
}

#[derive(Debug, Default, Deserialize)]
struct RawMonitorConfig {
    grafana_admin_password: Option<String>,
}

pub fn monitor_config(value: &serde_json::Value) -> Result<MonitorConfig> {
    let raw: RawMonitorConfig = if value.is_null() {
        RawMonitorConfig::default()
    } else {
        serde_json::from_value(value.clone())
            .map_err(|e| ExitError::bad_args(format!("invalid monitor service config: {e}")))?
    };
    Ok(MonitorConfig {
        grafana_admin_password: raw.grafana_admin_password.unwrap_or_else(|| "admin".to_string()),
    })
}

#[derive(Debug, Deserialize)]
struct RawCollectorConfig {
    exchange: String,
    data_root: String,
    metrics_port: Option<u16>,
}

pub fn collector_config(value: &serde_json::Value) -> Result<CollectorConfig> {
    let raw: RawCollectorConfig = serde_json::from_value(value.clone())
        .map_err(|e| ExitError::bad_args(format!("invalid data-collector service config: {e}")))?;
    let mut config = CollectorConfig::new(raw.exchange, raw.data_root);
    if let Some(port) = raw.metrics_port {
        config.metrics_port = port;
    }
    Ok(config)
}

#[derive(Debug, Deserialize)]
struct RawFreqtradeConfig {
    strategy_name: String,
    strategy_dir: PathBuf,
    base_config_path: PathBuf,
    api_port: Option<u16>,
}

pub fn freqtrade_config(value: &serde_json::Value) -> Result<FreqtradeConfig> {
    let raw: RawFreqtradeConfig = serde_json::from_value(value.clone())
        .map_err(|e| ExitError::bad_args(format!("invalid freqtrade service config: {e}")))?;
    let mut config = FreqtradeConfig::new(raw.strategy_name, raw.strategy_dir, raw.base_config_path);
    if let Some(port) = raw.api_port {
        config.api_port = port;
    }
    Ok(config)
}

/// Print a one-line-per-host-phase summary, per spec.md §7
/// "human-readable per-host, per-phase summary".
pub fn print_run_report(report: &fleet_orchestrator::RunReport) {
    for outcome in &report.outcomes {
        let status = match &outcome.status {
            fleet_orchestrator::PhaseStatus::Success => "ok".to_string(),
            fleet_orchestrator::PhaseStatus::Failed(message) => format!("FAILED: {message}"),
            fleet_orchestrator::PhaseStatus::Cancelled => "cancelled".to_string(),
        };
        println!("{:<20} {:<10} {}", outcome.host, outcome.phase, status);
    }
}
