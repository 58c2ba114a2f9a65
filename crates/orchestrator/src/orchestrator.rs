// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! The top-level Orchestrator: spec.md §4.J's five phases, wired
//! together over the Remote Execution Engine, Security Pipeline, and
//! Service Deployers. Cancellation is applied only at this level, via
//! `tokio_util::sync::CancellationToken` raced against each phase's
//! per-host work in `phases.rs` -- the already-tested `SessionAdapter`/
//! `SecurityPipeline`/`Deployer` signatures are left unmodified rather
//! than threading a token through every one of their calls.

use std::collections::HashMap;

use fleet_core::{EnvironmentSpec, SecurityHostConfig};
use fleet_remote::SessionAdapter;
use fleet_security::{Cooldown, SecurityPipeline, Sleeper};
use fleet_services::ServiceRegistry;
use tokio_util::sync::CancellationToken;

use crate::phases::{self, HostOutcome};
use crate::plan::{build_plan, Plan};
use crate::provisioner::ProvisionerHook;

/// The full, phase-by-phase result of one Orchestrator run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcomes: Vec<HostOutcome>,
    pub overall_success: bool,
}

/// Drives one Environment Spec through Plan -> Provision -> Secure ->
/// Service -> Summarize.
pub struct Orchestrator<P, A, S>
where
    P: ProvisionerHook,
    A: SessionAdapter + Clone + 'static,
    S: Sleeper,
{
    provisioner: P,
    adapter: A,
    pipeline: SecurityPipeline<A>,
    cooldown: Cooldown<S>,
    registry: ServiceRegistry,
}

impl<P, A, S> Orchestrator<P, A, S>
where
    P: ProvisionerHook,
    A: SessionAdapter + Clone + 'static,
    S: Sleeper,
{
    pub fn new(
        provisioner: P,
        adapter: A,
        pipeline: SecurityPipeline<A>,
        cooldown: Cooldown<S>,
        registry: ServiceRegistry,
    ) -> Self {
        Self {
            provisioner,
            adapter,
            pipeline,
            cooldown,
            registry,
        }
    }

    /// Phase 1: emit the plan without executing anything.
    pub fn plan(&self, spec: &EnvironmentSpec) -> Plan {
        build_plan(spec)
    }

    /// Run phases 2-5 against `spec`, honoring `cancel` between (not
    /// within) each host's unit of work.
    pub async fn run(&self, spec: &EnvironmentSpec, cancel: &CancellationToken) -> RunReport {
        let mut outcomes = Vec::new();

        let (mut hosts, provision_outcomes) = phases::run_provision_phase(
            &self.provisioner,
            &self.adapter,
            &spec.infrastructure,
            cancel,
        )
        .await;
        outcomes.extend(provision_outcomes);

        let config_for = |instance_ip: &str| -> SecurityHostConfig { spec.security_config_for(instance_ip) };

        let secure_outcomes = phases::run_secure_phase(
            &self.pipeline,
            &self.cooldown,
            &mut hosts,
            &spec.security.instances,
            config_for,
            spec.security.vpn_network.is_some(),
            cancel,
        )
        .await;
        outcomes.extend(secure_outcomes);

        let service_outcomes = phases::run_service_phase(
            &self.registry,
            &self.pipeline,
            &hosts,
            &spec.services,
            config_for,
            cancel,
        )
        .await;
        outcomes.extend(service_outcomes);

        let overall_success = phases::overall_success(&outcomes);
        RunReport {
            outcomes,
            overall_success,
        }
    }

    /// Per-host, per-phase result map for a completed run -- spec.md
    /// §4.J phase 5 "Summarize".
    pub fn summarize(report: &RunReport) -> HashMap<String, Vec<HostOutcome>> {
        let mut by_host: HashMap<String, Vec<HostOutcome>> = HashMap::new();
        for outcome in &report.outcomes {
            by_host.entry(outcome.host.clone()).or_default().push(outcome.clone());
        }
        by_host
    }
}
