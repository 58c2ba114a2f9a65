// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Phase drivers: Provision, Secure, Service. Grounded on
//! `oj-daemon::lifecycle/reconcile.rs`'s per-entity sequencing and
//! `oj-engine::scheduler.rs`'s fan-out shape, retargeted from tmux
//! session bookkeeping to a `tokio::task::JoinSet` of per-host futures
//! -- spec.md §5 allows Provision and Service phases to run hosts in
//! parallel while the Security Pipeline stays strictly sequential per
//! host.

use std::collections::HashMap;

use fleet_core::{ErrorKind, FleetError, Host};
use fleet_remote::SessionAdapter;
use fleet_security::{Cooldown, SecurityPipeline, Sleeper};
use fleet_services::ServiceRegistry;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::provisioner::ProvisionerHook;

/// Outcome of one phase's work against one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseStatus {
    Success,
    Failed(String),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct HostOutcome {
    pub host: String,
    pub phase: &'static str,
    pub status: PhaseStatus,
}

impl HostOutcome {
    fn ok(host: &str, phase: &'static str) -> Self {
        Self {
            host: host.to_string(),
            phase,
            status: PhaseStatus::Success,
        }
    }

    fn failed(host: &str, phase: &'static str, message: impl Into<String>) -> Self {
        Self {
            host: host.to_string(),
            phase,
            status: PhaseStatus::Failed(message.into()),
        }
    }
}

/// Provision every infrastructure host spec in parallel, waiting for
/// each to become reachable. A failed host produces a `Failed` outcome
/// and is absent from the returned host map -- per spec.md §4.J, a
/// failed host short-circuits any later phase that would target it.
pub async fn run_provision_phase<P, A>(
    provisioner: &P,
    adapter: &A,
    specs: &[fleet_core::env_spec::InfrastructureHostSpec],
    cancel: &CancellationToken,
) -> (HashMap<String, Host>, Vec<HostOutcome>)
where
    P: ProvisionerHook,
    A: SessionAdapter + Clone + 'static,
{
    let mut hosts = HashMap::new();
    let mut outcomes = Vec::new();

    let mut join_set: JoinSet<(String, Result<Host, String>)> = JoinSet::new();
    for spec in specs {
        let host_spec = spec.clone();
        let provisioned = tokio::select! {
            _ = cancel.cancelled() => {
                outcomes.push(HostOutcome {
                    host: spec.name.clone(),
                    phase: "provision",
                    status: PhaseStatus::Cancelled,
                });
                continue;
            }
            result = provisioner.provision(&host_spec) => result,
        };

        match provisioned {
            Ok(host) => {
                let adapter = adapter.clone();
                let name = spec.name.clone();
                join_set.spawn(async move {
                    let reachable = adapter.is_reachable(&host).await;
                    if reachable {
                        (name, Ok(host))
                    } else {
                        (name, Err("host did not become reachable".to_string()))
                    }
                });
            }
            Err(err) => outcomes.push(HostOutcome::failed(&spec.name, "provision", err.to_string())),
        }
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((name, Ok(host))) => {
                outcomes.push(HostOutcome::ok(&name, "provision"));
                hosts.insert(name, host);
            }
            Ok((name, Err(message))) => outcomes.push(HostOutcome::failed(&name, "provision", message)),
            Err(join_err) => {
                outcomes.push(HostOutcome::failed("<unknown>", "provision", join_err.to_string()))
            }
        }
    }

    (hosts, outcomes)
}

/// Run the Security Pipeline steps 1-4 (sequentially, per spec.md §5)
/// against every host named in `instance_names`, insert the
/// post-step-3 cooldown, then step 5 if a VPN network is configured,
/// then step 7 (verify) always. Mutates `hosts` in place: a
/// successful step 3 commits the new SSH port.
pub async fn run_secure_phase<A, S>(
    pipeline: &SecurityPipeline<A>,
    cooldown: &Cooldown<S>,
    hosts: &mut HashMap<String, Host>,
    instance_names: &[String],
    config_for: impl Fn(&str) -> fleet_core::SecurityHostConfig,
    vpn_requested: bool,
    cancel: &CancellationToken,
) -> Vec<HostOutcome>
where
    A: SessionAdapter,
    S: Sleeper,
{
    let mut outcomes = Vec::new();

    for name in instance_names {
        if cancel.is_cancelled() {
            outcomes.push(HostOutcome {
                host: name.clone(),
                phase: "secure",
                status: PhaseStatus::Cancelled,
            });
            continue;
        }

        let Some(host) = hosts.get(name) else {
            outcomes.push(HostOutcome::failed(name, "secure", "host not provisioned"));
            continue;
        };
        let host = host.clone();
        let config = config_for(name);

        let result: Result<(), FleetError> = async {
            pipeline
                .step1_initial(&host, &config)
                .await
                .map_err(|e| FleetError::remote_failure(e.to_string()))?;
            pipeline
                .step2_firewall_base(&host, &config)
                .await
                .map_err(|e| FleetError::remote_failure(e.to_string()))?;
            let (_, new_port) = pipeline
                .step3_ssh_hardening(&host, &config)
                .await
                .map_err(|e| FleetError::remote_failure(e.to_string()))?;

            if let Some(registered) = hosts.get_mut(name) {
                registered.commit_ssh_port(new_port);
            }
            let mut host = host;
            host.commit_ssh_port(new_port);

            cooldown.wait().await;

            pipeline
                .step4_fail2ban(&host, &config)
                .await
                .map_err(|e| FleetError::remote_failure(e.to_string()))?;

            if vpn_requested {
                pipeline
                    .step5_vpn_firewall(&host, &config)
                    .await
                    .map_err(|e| FleetError::remote_failure(e.to_string()))?;
            }

            pipeline
                .step7_verify(&host, &config)
                .await
                .map_err(|e| FleetError::remote_failure(e.to_string()))?;

            Ok(())
        }
        .await;

        match result {
            Ok(()) => outcomes.push(HostOutcome::ok(name, "secure")),
            Err(err) => outcomes.push(HostOutcome::failed(name, "secure", err.to_string())),
        }
    }

    outcomes
}

/// Deploy every service work item in spec order. On a successful
/// deploy, apply the service-kind-specific firewall (Security Pipeline
/// step 6) before moving to the next item.
pub async fn run_service_phase<A, S>(
    registry: &ServiceRegistry,
    pipeline: &SecurityPipeline<A>,
    hosts: &HashMap<String, Host>,
    items: &[fleet_core::ServiceWorkItem],
    config_for: impl Fn(&str) -> fleet_core::SecurityHostConfig,
    cancel: &CancellationToken,
) -> Vec<HostOutcome>
where
    A: SessionAdapter,
    S: Sleeper,
{
    let mut outcomes = Vec::new();

    for item in items {
        if cancel.is_cancelled() {
            outcomes.push(HostOutcome {
                host: item.target.clone(),
                phase: "service",
                status: PhaseStatus::Cancelled,
            });
            continue;
        }

        let Some(host) = hosts.get(&item.target) else {
            outcomes.push(HostOutcome::failed(&item.target, "service", "host not provisioned"));
            continue;
        };
        let Some(deployer) = registry.get(item.kind) else {
            outcomes.push(HostOutcome::failed(
                &item.target,
                "service",
                format!("no deployer registered for {:?}", item.kind),
            ));
            continue;
        };

        match deployer.deploy(host).await {
            Ok(()) => {
                let config = config_for(&item.target);
                let firewall_result = pipeline
                    .step6_service_firewall(host, &config, item.kind.profile_slug())
                    .await;
                match firewall_result {
                    Ok(_) => outcomes.push(HostOutcome::ok(&item.target, "service")),
                    Err(err) => outcomes.push(HostOutcome::failed(&item.target, "service", err.to_string())),
                }
            }
            Err(err) => outcomes.push(HostOutcome::failed(&item.target, "service", err.to_string())),
        }
    }

    outcomes
}

pub fn overall_success(outcomes: &[HostOutcome]) -> bool {
    outcomes
        .iter()
        .all(|o| matches!(o.status, PhaseStatus::Success))
}

pub fn to_fleet_error(outcomes: &[HostOutcome]) -> Option<FleetError> {
    if overall_success(outcomes) {
        return None;
    }
    let failing: Vec<String> = outcomes
        .iter()
        .filter(|o| !matches!(o.status, PhaseStatus::Success))
        .map(|o| format!("{}/{}: {:?}", o.phase, o.host, o.status))
        .collect();
    Some(FleetError::new(
        ErrorKind::FleetPartial,
        format!("{} host/phase outcome(s) did not succeed: {}", failing.len(), failing.join("; ")),
    ))
}
