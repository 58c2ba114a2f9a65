// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `ServiceKind -> Deployer` lookup. REDESIGN FLAGS: this registry is
//! what replaces the inheritance hierarchy a factory function over
//! `BaseServiceManager` subclasses would otherwise need -- callers hold
//! a `ServiceRegistry` and ask it for the deployer matching a work
//! item's `kind`, rather than branching on the kind themselves.

use std::collections::HashMap;
use std::sync::Arc;

use fleet_core::ServiceKind;

use crate::deployer::Deployer;

/// Maps each `ServiceKind` to the one `Deployer` that handles it for a
/// given Orchestrator run. Built once per run, since each deployer is
/// constructed against a fixed playbook directory and default config.
#[derive(Clone, Default)]
pub struct ServiceRegistry {
    deployers: HashMap<ServiceKind, Arc<dyn Deployer>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ServiceKind, deployer: Arc<dyn Deployer>) {
        self.deployers.insert(kind, deployer);
    }

    pub fn get(&self, kind: ServiceKind) -> Option<Arc<dyn Deployer>> {
        self.deployers.get(&kind).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployer::{DeployError, HealthReport};
    use async_trait::async_trait;
    use fleet_core::Host;

    struct StubDeployer;

    #[async_trait]
    impl Deployer for StubDeployer {
        async fn deploy(&self, _host: &Host) -> Result<(), DeployError> {
            Ok(())
        }
        async fn start(&self, _host: &Host) -> Result<(), DeployError> {
            Ok(())
        }
        async fn stop(&self, _host: &Host) -> Result<(), DeployError> {
            Ok(())
        }
        async fn health_check(&self, _host: &Host) -> HealthReport {
            HealthReport::unknown("stub")
        }
        async fn get_logs(&self, _host: &Host, _lines: u32) -> Result<String, DeployError> {
            Ok(String::new())
        }
        fn kind_name(&self) -> &'static str {
            "stub"
        }
    }

    #[test]
    fn unregistered_kind_returns_none() {
        let registry = ServiceRegistry::new();
        assert!(registry.get(ServiceKind::Monitor).is_none());
    }

    #[test]
    fn registered_kind_resolves() {
        let mut registry = ServiceRegistry::new();
        registry.register(ServiceKind::Monitor, Arc::new(StubDeployer));
        assert!(registry.get(ServiceKind::Monitor).is_some());
        assert!(registry.get(ServiceKind::Freqtrade).is_none());
    }
}
