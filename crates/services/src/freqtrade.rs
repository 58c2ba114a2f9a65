// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The Freqtrade bot deployer. Grounded on
//! `original_source/deployers/freqtrade.py::FreqtradeDeployer`: a
//! single `freqtrade` container per host, a strategy directory and
//! base config pushed before container start, and an HTTP API whose
//! liveness is indicated by either a 200 or a 401 response (the API
//! requires auth the deployer does not hold, per spec.md §4.H).

use async_trait::async_trait;
use fleet_core::Host;
use fleet_remote::SessionAdapter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::deployer::{DeployError, Deployer, HealthReport, HealthState};

pub const DEFAULT_API_PORT: u16 = 8080;
pub const CONTAINER_NAME: &str = "freqtrade";

#[derive(Debug, Clone)]
pub struct FreqtradeConfig {
    pub strategy_name: String,
    pub strategy_dir: PathBuf,
    pub base_config_path: PathBuf,
    pub api_port: u16,
}

impl FreqtradeConfig {
    pub fn new(
        strategy_name: impl Into<String>,
        strategy_dir: impl Into<PathBuf>,
        base_config_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.into(),
            strategy_dir: strategy_dir.into(),
            base_config_path: base_config_path.into(),
            api_port: DEFAULT_API_PORT,
        }
    }
}

pub struct FreqtradeDeployer<A: SessionAdapter> {
    adapter: A,
    playbook_dir: PathBuf,
    config: FreqtradeConfig,
    http: reqwest::Client,
}

impl<A: SessionAdapter> FreqtradeDeployer<A> {
    pub fn new(adapter: A, playbook_dir: impl Into<PathBuf>, config: FreqtradeConfig) -> Self {
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

    fn api_url(&self, host: &Host, path: &str) -> String {
        format!("http://{}:{}{}", host.public_address, self.config.api_port, path)
    }
}

#[async_trait]
impl<A: SessionAdapter> Deployer for FreqtradeDeployer<A> {
    async fn deploy(&self, host: &Host) -> Result<(), DeployError> {
        let remote_strategy_dir = format!("/opt/freqtrade/strategies/{}", self.config.strategy_name);
        self.adapter
            .put(
                host,
                &self.config.strategy_dir,
                &remote_strategy_dir,
            )
            .await?;

        let remote_config = "/opt/freqtrade/config.json";
        self.adapter
            .put(host, &self.config.base_config_path, remote_config)
            .await?;

        let mut vars: HashMap<String, serde_json::Value> = HashMap::new();
        vars.insert("strategy_name".to_string(), self.config.strategy_name.clone().into());
        vars.insert("api_port".to_string(), self.config.api_port.into());

        let result = self
            .adapter
            .run_playbook(host, host.ssh_port, &self.playbook("deploy_freqtrade.yml"), &vars)
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
        let (code, _, stderr) = self.adapter.exec(host, &format!("docker start {CONTAINER_NAME}")).await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "start", message: stderr });
        }
        Ok(())
    }

    async fn stop(&self, host: &Host) -> Result<(), DeployError> {
        let (code, _, stderr) = self.adapter.exec(host, &format!("docker stop {CONTAINER_NAME}")).await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "stop", message: stderr });
        }
        Ok(())
    }

    async fn health_check(&self, host: &Host) -> HealthReport {
        let response = match self.http.get(self.api_url(host, "/api/v1/ping")).send().await {
            Ok(response) => response,
            Err(error) => return HealthReport::unknown(error.to_string()),
        };

        let status = response.status();
        if status.is_success() || status.as_u16() == 401 {
            let mut metrics = HashMap::new();
            metrics.insert("http_status".to_string(), status.as_u16().to_string());
            HealthReport {
                status: HealthState::Healthy,
                metrics,
                message: "freqtrade API is reachable".to_string(),
            }
        } else {
            HealthReport {
                status: HealthState::Unhealthy,
                metrics: HashMap::new(),
                message: format!("freqtrade API returned {status}"),
            }
        }
    }

    async fn get_logs(&self, host: &Host, lines: u32) -> Result<String, DeployError> {
        let (code, stdout, stderr) = self
            .adapter
            .exec(host, &format!("docker logs --tail {lines} {CONTAINER_NAME}"))
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "get_logs", message: stderr });
        }
        Ok(stdout)
    }

    fn kind_name(&self) -> &'static str {
        "freqtrade"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_remote::fake::FakeSessionAdapter;

    fn sample_host() -> Host {
        Host::new("bot-1", "203.0.113.40")
    }

    fn sample_config() -> FreqtradeConfig {
        FreqtradeConfig::new("grid_v2", "/local/strategies/grid_v2", "/local/base_config.json")
    }

    #[tokio::test]
    async fn deploy_pushes_strategy_and_config_before_running_playbook() {
        let adapter = FakeSessionAdapter::new();
        let deployer = FreqtradeDeployer::new(adapter.clone(), "/opt/playbooks", sample_config());
        deployer.deploy(&sample_host()).await.expect("deploy");

        let calls = adapter.calls();
        assert_eq!(calls.len(), 3);
        assert!(matches!(calls[0], fleet_remote::fake::SessionCall::Put { .. }));
        assert!(matches!(calls[1], fleet_remote::fake::SessionCall::Put { .. }));
        assert!(matches!(calls[2], fleet_remote::fake::SessionCall::RunPlaybook { .. }));
    }

    #[tokio::test]
    async fn scale_is_not_supported() {
        let adapter = FakeSessionAdapter::new();
        let deployer = FreqtradeDeployer::new(adapter, "/opt/playbooks", sample_config());
        assert!(matches!(
            deployer.scale(&sample_host(), 2).await,
            Err(DeployError::NotSupported("freqtrade"))
        ));
    }
}
