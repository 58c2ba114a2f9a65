// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet deploy-environment` -- the full Plan -> Provision -> Secure
//! -> Service -> Summarize run (spec.md §4.J) for one Environment Spec.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use fleet_core::env_spec::ServiceKind;
use fleet_orchestrator::Orchestrator;
use fleet_services::{DataCollectorDeployer, Deployer, FreqtradeDeployer, MonitorDeployer, ServiceRegistry};
use tokio_util::sync::CancellationToken;

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct DeployEnvironmentArgs {
    /// Environment Spec YAML file.
    #[arg(long)]
    config: PathBuf,

    /// Emit the plan and stop without performing any work.
    #[arg(long)]
    dry_run: bool,

    #[command(flatten)]
    remote: RemoteArgs,
}

pub async fn handle(args: DeployEnvironmentArgs) -> Result<()> {
    let spec = common::load_environment(&args.config)?;

    if args.dry_run {
        let plan = fleet_orchestrator::build_plan(&spec);
        for item in &plan.items {
            println!("[{}] {}", item.phase, item.description);
        }
        return Ok(());
    }

    let adapter = args.remote.adapter();
    let pipeline = args.remote.pipeline(adapter.clone());
    let cooldown = args.remote.cooldown();
    let provisioner = args.remote.provisioner();
    let registry = build_registry(&args.remote, &spec.services)?;

    let orchestrator = Orchestrator::new(provisioner, adapter, pipeline, cooldown, registry);
    let cancel = CancellationToken::new();
    let report = orchestrator.run(&spec, &cancel).await;

    common::print_run_report(&report);

    if report.overall_success {
        Ok(())
    } else {
        Err(ExitError::generic("one or more hosts/phases did not complete successfully"))
    }
}

/// Build one `Deployer` per service kind present in the spec, keyed by
/// `ServiceKind` (spec.md §9 "no base class" REDESIGN FLAG realized by
/// `fleet_services::ServiceRegistry`). A spec with more than one work
/// item of the same kind has the last one win the kind's config --
/// the registry is keyed purely by kind, not by (kind, target).
fn build_registry(
    remote: &RemoteArgs,
    services: &[fleet_core::ServiceWorkItem],
) -> Result<ServiceRegistry> {
    let mut registry = ServiceRegistry::new();
    let adapter = remote.adapter();

    for item in services {
        match item.kind {
            ServiceKind::Monitor => {
                let config = common::monitor_config(&item.config)?;
                let deployer: Arc<dyn Deployer> =
                    Arc::new(MonitorDeployer::new(adapter.clone(), &remote.playbook_dir, config));
                registry.register(ServiceKind::Monitor, deployer);
            }
            ServiceKind::DataCollector => {
                let config = common::collector_config(&item.config)?;
                let deployer: Arc<dyn Deployer> = Arc::new(DataCollectorDeployer::new(
                    adapter.clone(),
                    &remote.playbook_dir,
                    config,
                ));
                registry.register(ServiceKind::DataCollector, deployer);
            }
            ServiceKind::Freqtrade => {
                let config = common::freqtrade_config(&item.config)?;
                let deployer: Arc<dyn Deployer> = Arc::new(FreqtradeDeployer::new(
                    adapter.clone(),
                    &remote.playbook_dir,
                    config,
                ));
                registry.register(ServiceKind::Freqtrade, deployer);
            }
        }
    }

    Ok(registry)
}
