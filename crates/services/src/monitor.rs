// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The monitoring-stack deployer: Prometheus + Grafana + Alertmanager.
//! Grounded on `original_source/deployers/monitor.py::MonitorDeployer`,
//! whose `deploy` sequence (Docker setup -> Prometheus -> Grafana ->
//! Alertmanager -> dashboards -> alert rules) is reproduced here as a
//! single `run_playbook` invocation per spec.md §4.H's "fixed ordered
//! list of A-invocations" contract (the playbook owns the per-step
//! ordering; this deployer owns which playbook and which vars).

use async_trait::async_trait;
use fleet_core::Host;
use fleet_remote::SessionAdapter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::deployer::{DeployError, Deployer, HealthReport, HealthState};

pub const PROMETHEUS_PORT: u16 = 9090;
pub const GRAFANA_PORT: u16 = 3000;
pub const ALERTMANAGER_PORT: u16 = 9093;

/// Configuration passed in from the Service Work Item's `config` map
/// (spec.md §3 "Service Work Item").
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub grafana_admin_password: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            grafana_admin_password: "admin".to_string(),
        }
    }
}

/// Deploys and manages the monitoring stack on one host.
pub struct MonitorDeployer<A: SessionAdapter> {
    adapter: A,
    playbook_dir: PathBuf,
    config: MonitorConfig,
    http: reqwest::Client,
}

impl<A: SessionAdapter> MonitorDeployer<A> {
    pub fn new(adapter: A, playbook_dir: impl Into<PathBuf>, config: MonitorConfig) -> Self {
        Self {
            adapter,
            playbook_dir: playbook_dir.into(),
            config,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }

    fn playbook(&self, name: &str) -> PathBuf {
        self.playbook_dir.join(name)
    }

    fn base_url(host: &Host, port: u16) -> String {
        format!("http://{}:{}", host.public_address, port)
    }

    /// Dynamically add a Prometheus scrape target: rewrites the
    /// target's config on the host and hot-reloads it, per spec.md
    /// §4.H "add-scrape-target operation". A repeat call with the same
    /// `job_name` replaces the prior target set for that job --
    /// enforced by the playbook always writing the full target list
    /// for the job, not appending to it.
    pub async fn add_scrape_target(
        &self,
        host: &Host,
        job_name: &str,
        targets: &[String],
        labels: HashMap<String, String>,
    ) -> Result<(), DeployError> {
        let mut vars: HashMap<String, serde_json::Value> = HashMap::new();
        vars.insert("job_name".to_string(), job_name.into());
        vars.insert("targets".to_string(), serde_json::to_value(targets).unwrap_or_default());
        vars.insert("labels".to_string(), serde_json::to_value(&labels).unwrap_or_default());

        let result = self
            .adapter
            .run_playbook(host, host.ssh_port, &self.playbook("add_prometheus_target.yml"), &vars)
            .await?;
        if !result.success() {
            return Err(DeployError::StepFailed {
                step: "add_scrape_target",
                message: result.stderr,
            });
        }

        let reload_url = format!("{}/-/reload", Self::base_url(host, PROMETHEUS_PORT));
        let _ = self.http.post(&reload_url).send().await;
        Ok(())
    }

    async fn probe_ok(&self, url: &str) -> bool {
        self.http
            .get(url)
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl<A: SessionAdapter> Deployer for MonitorDeployer<A> {
    async fn deploy(&self, host: &Host) -> Result<(), DeployError> {
        let mut vars: HashMap<String, serde_json::Value> = HashMap::new();
        vars.insert(
            "grafana_admin_password".to_string(),
            self.config.grafana_admin_password.clone().into(),
        );

        let result = self
            .adapter
            .run_playbook(host, host.ssh_port, &self.playbook("deploy_monitor.yml"), &vars)
            .await?;
        if !result.success() {
            return Err(DeployError::StepFailed {
                step: "deploy",
                message: result.stderr,
            });
        }
        Ok(())
    }

    async fn start(&self, host: &Host) -> Result<(), DeployError> {
        let (code, _, stderr) = self
            .adapter
            .exec(host, "docker start prometheus grafana alertmanager")
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "start", message: stderr });
        }
        Ok(())
    }

    async fn stop(&self, host: &Host) -> Result<(), DeployError> {
        let (code, _, stderr) = self
            .adapter
            .exec(host, "docker stop prometheus grafana alertmanager")
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "stop", message: stderr });
        }
        Ok(())
    }

    async fn health_check(&self, host: &Host) -> HealthReport {
        let prometheus_ok = self
            .probe_ok(&format!("{}/-/healthy", Self::base_url(host, PROMETHEUS_PORT)))
            .await;
        let grafana_ok = self
            .probe_ok(&format!("{}/api/health", Self::base_url(host, GRAFANA_PORT)))
            .await;

        let mut metrics = HashMap::new();
        metrics.insert("prometheus_healthy".to_string(), prometheus_ok.to_string());
        metrics.insert("grafana_healthy".to_string(), grafana_ok.to_string());

        let (status, message) = match (prometheus_ok, grafana_ok) {
            (true, true) => (HealthState::Healthy, "all monitoring components are healthy"),
            (false, false) => (HealthState::Unhealthy, "monitoring stack is down"),
            _ => (HealthState::Degraded, "some monitoring components are unhealthy"),
        };

        HealthReport {
            status,
            metrics,
            message: message.to_string(),
        }
    }

    async fn get_logs(&self, host: &Host, lines: u32) -> Result<String, DeployError> {
        let (code, stdout, stderr) = self
            .adapter
            .exec(host, &format!("docker logs --tail {lines} prometheus"))
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "get_logs", message: stderr });
        }
        Ok(stdout)
    }

    fn kind_name(&self) -> &'static str {
        "monitor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_remote::fake::FakeSessionAdapter;

    fn sample_host() -> Host {
        Host::new("monitor-1", "203.0.113.20")
    }

    #[tokio::test]
    async fn deploy_runs_playbook_and_succeeds_on_zero_exit() {
        let adapter = FakeSessionAdapter::new();
        let deployer = MonitorDeployer::new(adapter.clone(), "/opt/playbooks", MonitorConfig::default());
        let host = sample_host();

        deployer.deploy(&host).await.expect("deploy");

        let ran = adapter
            .calls()
            .iter()
            .any(|c| matches!(c, fleet_remote::fake::SessionCall::RunPlaybook { .. }));
        assert!(ran);
    }

    #[tokio::test]
    async fn unreachable_host_health_check_reports_unhealthy_not_error() {
        let adapter = FakeSessionAdapter::new();
        let deployer = MonitorDeployer::new(adapter, "/opt/playbooks", MonitorConfig::default());
        let mut host = sample_host();
        host.public_address = "203.0.113.255".to_string();

        let report = deployer.health_check(&host).await;
        assert_eq!(report.status, HealthState::Unhealthy);
    }

    #[tokio::test]
    async fn scale_is_not_supported() {
        let adapter = FakeSessionAdapter::new();
        let deployer = MonitorDeployer::new(adapter, "/opt/playbooks", MonitorConfig::default());
        let host = sample_host();
        assert!(matches!(
            deployer.scale(&host, 3).await,
            Err(DeployError::NotSupported("monitor"))
        ));
    }
}
