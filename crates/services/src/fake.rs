// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! A scriptable `Deployer` for tests of the Orchestrator's Service
//! phase that would otherwise need a real `MonitorDeployer`/
//! `DataCollectorDeployer`/`FreqtradeDeployer` wired to a live host.

use async_trait::async_trait;
use fleet_core::Host;
use parking_lot::Mutex;
use std::sync::Arc;

use crate::deployer::{DeployError, Deployer, HealthReport, HealthState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployerCall {
    Deploy(String),
    Start(String),
    Stop(String),
    HealthCheck(String),
    GetLogs(String),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<DeployerCall>,
    fail_deploy: bool,
    health: Option<HealthState>,
}

/// A fake `Deployer` whose `deploy` outcome and health status are
/// scripted by the test before use.
#[derive(Clone, Default)]
pub struct FakeDeployer {
    state: Arc<Mutex<FakeState>>,
    kind_name: &'static str,
}

impl FakeDeployer {
    pub fn new(kind_name: &'static str) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            kind_name,
        }
    }

    pub fn fail_deploy(&self) {
        self.state.lock().fail_deploy = true;
    }

    pub fn set_health(&self, status: HealthState) {
        self.state.lock().health = Some(status);
    }

    pub fn calls(&self) -> Vec<DeployerCall> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl Deployer for FakeDeployer {
    async fn deploy(&self, host: &Host) -> Result<(), DeployError> {
        let mut state = self.state.lock();
        state.calls.push(DeployerCall::Deploy(host.name.clone()));
        if state.fail_deploy {
            return Err(DeployError::StepFailed {
                step: "deploy",
                message: "scripted failure".to_string(),
            });
        }
        Ok(())
    }

    async fn start(&self, host: &Host) -> Result<(), DeployError> {
        self.state.lock().calls.push(DeployerCall::Start(host.name.clone()));
        Ok(())
    }

    async fn stop(&self, host: &Host) -> Result<(), DeployError> {
        self.state.lock().calls.push(DeployerCall::Stop(host.name.clone()));
        Ok(())
    }

    async fn health_check(&self, host: &Host) -> HealthReport {
        let mut state = self.state.lock();
        state.calls.push(DeployerCall::HealthCheck(host.name.clone()));
        HealthReport {
            status: state.health.unwrap_or(HealthState::Healthy),
            metrics: Default::default(),
            message: "fake health check".to_string(),
        }
    }

    async fn get_logs(&self, host: &Host, _lines: u32) -> Result<String, DeployError> {
        self.state.lock().calls.push(DeployerCall::GetLogs(host.name.clone()));
        Ok("fake log output".to_string())
    }

    fn kind_name(&self) -> &'static str {
        self.kind_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_deploy_failure_is_returned() {
        let deployer = FakeDeployer::new("monitor");
        deployer.fail_deploy();
        let host = Host::new("h1", "203.0.113.1");
        assert!(deployer.deploy(&host).await.is_err());
    }

    #[tokio::test]
    async fn scripted_health_status_is_reported() {
        let deployer = FakeDeployer::new("monitor");
        deployer.set_health(HealthState::Degraded);
        let host = Host::new("h1", "203.0.113.1");
        let report = deployer.health_check(&host).await;
        assert_eq!(report.status, HealthState::Degraded);
    }
}
