// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The per-exchange data-collector deployer. Grounded on
//! `original_source/deployers/data_collector.py::DataCollectorDeployer`.
//! Note the default metrics port here is 8000, per spec.md §4.H's
//! deployer table -- the original's 9090 default is not followed.

use async_trait::async_trait;
use fleet_core::Host;
use fleet_remote::SessionAdapter;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::deployer::{DeployError, Deployer, HealthReport, HealthState};

pub const DEFAULT_METRICS_PORT: u16 = 8000;
pub const LIVENESS_COUNTER: &str = "orderbook_collector_messages_received_total";

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub exchange: String,
    pub metrics_port: u16,
    pub data_root: String,
}

impl CollectorConfig {
    pub fn new(exchange: impl Into<String>, data_root: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            metrics_port: DEFAULT_METRICS_PORT,
            data_root: data_root.into(),
        }
    }
}

/// Deploys and manages the orderbook/tick collector process for one
/// exchange on one host.
pub struct DataCollectorDeployer<A: SessionAdapter> {
    adapter: A,
    playbook_dir: PathBuf,
    config: CollectorConfig,
    http: reqwest::Client,
}

impl<A: SessionAdapter> DataCollectorDeployer<A> {
    pub fn new(adapter: A, playbook_dir: impl Into<PathBuf>, config: CollectorConfig) -> Self {
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

    fn metrics_url(&self, host: &Host) -> String {
        format!("http://{}:{}/metrics", host.public_address, self.config.metrics_port)
    }

    fn service_unit(&self) -> String {
        format!("data-collector-{}", self.config.exchange)
    }
}

#[async_trait]
impl<A: SessionAdapter> Deployer for DataCollectorDeployer<A> {
    async fn deploy(&self, host: &Host) -> Result<(), DeployError> {
        let mut vars: HashMap<String, serde_json::Value> = HashMap::new();
        vars.insert("exchange".to_string(), self.config.exchange.clone().into());
        vars.insert("metrics_port".to_string(), self.config.metrics_port.into());
        vars.insert("data_root".to_string(), self.config.data_root.clone().into());

        let result = self
            .adapter
            .run_playbook(host, host.ssh_port, &self.playbook("deploy_data_collector.yml"), &vars)
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
            .exec(host, &format!("systemctl start {}", self.service_unit()))
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "start", message: stderr });
        }
        Ok(())
    }

    async fn stop(&self, host: &Host) -> Result<(), DeployError> {
        let (code, _, stderr) = self
            .adapter
            .exec(host, &format!("systemctl stop {}", self.service_unit()))
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "stop", message: stderr });
        }
        Ok(())
    }

    async fn health_check(&self, host: &Host) -> HealthReport {
        let response = match self.http.get(self.metrics_url(host)).send().await {
            Ok(response) => response,
            Err(error) => return HealthReport::unknown(error.to_string()),
        };
        if !response.status().is_success() {
            return HealthReport {
                status: HealthState::Unhealthy,
                metrics: HashMap::new(),
                message: format!("metrics endpoint returned {}", response.status()),
            };
        }
        let body = response.text().await.unwrap_or_default();
        let received = body
            .lines()
            .find(|line| line.starts_with(LIVENESS_COUNTER))
            .and_then(|line| line.split_whitespace().last())
            .unwrap_or("0")
            .to_string();

        let mut metrics = HashMap::new();
        metrics.insert(LIVENESS_COUNTER.to_string(), received);

        HealthReport {
            status: HealthState::Healthy,
            metrics,
            message: "collector is exporting metrics".to_string(),
        }
    }

    async fn get_logs(&self, host: &Host, lines: u32) -> Result<String, DeployError> {
        let (code, stdout, stderr) = self
            .adapter
            .exec(
                host,
                &format!("journalctl -u {} -n {lines} --no-pager", self.service_unit()),
            )
            .await?;
        if code != 0 {
            return Err(DeployError::StepFailed { step: "get_logs", message: stderr });
        }
        Ok(stdout)
    }

    fn kind_name(&self) -> &'static str {
        "data-collector"
    }
}
