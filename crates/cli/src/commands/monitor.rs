// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet monitor` -- deploy and operate the Prometheus/Grafana/
//! Alertmanager stack on one host (spec.md §4.H).

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_core::env_spec::ServiceKind;
use fleet_services::{Deployer, MonitorConfig, MonitorDeployer};

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct MonitorArgs {
    #[command(subcommand)]
    command: MonitorCommand,
}

#[derive(Subcommand)]
enum MonitorCommand {
    Deploy {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Add (or replace) the scrape targets for one Prometheus job.
    AddTarget {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[arg(long)]
        job: String,
        /// Scrape targets, e.g. `10.0.0.5:8000`.
        #[arg(long = "endpoint", required = true)]
        endpoints: Vec<String>,
        /// Labels as `key=value`, repeatable.
        #[arg(long = "label")]
        labels: Vec<String>,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    Status {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    Logs {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[arg(long, default_value_t = 100)]
        lines: u32,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    Restart {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
}

async fn deployer_for(
    remote: &RemoteArgs,
    spec: &fleet_core::EnvironmentSpec,
    target: &str,
) -> Result<(fleet_core::Host, MonitorDeployer<fleet_remote::SshSession>)> {
    let provisioner = remote.provisioner();
    let host = common::resolve_host(&provisioner, spec, target).await?;
    let config = match common::find_service_item(spec, ServiceKind::Monitor, target) {
        Some(item) => common::monitor_config(&item.config)?,
        None => MonitorConfig::default(),
    };
    let deployer = MonitorDeployer::new(remote.adapter(), &remote.playbook_dir, config);
    Ok((host, deployer))
}

pub async fn handle(args: MonitorArgs) -> Result<()> {
    match args.command {
        MonitorCommand::Deploy { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.deploy(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("monitor stack deployed to '{target}'");
            Ok(())
        }
        MonitorCommand::AddTarget {
            config,
            target,
            job,
            endpoints,
            labels,
            remote,
        } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let labels = parse_labels(&labels)?;
            deployer
                .add_scrape_target(&host, &job, &endpoints, labels)
                .await
                .map_err(|e| ExitError::generic(e.to_string()))?;
            println!("scrape target for job '{job}' updated on '{target}'");
            Ok(())
        }
        MonitorCommand::Status { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let report = deployer.health_check(&host).await;
            println!("{target}: {:?} -- {}", report.status, report.message);
            Ok(())
        }
        MonitorCommand::Logs { config, target, lines, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let logs = deployer
                .get_logs(&host, lines)
                .await
                .map_err(|e| ExitError::generic(e.to_string()))?;
            print!("{logs}");
            Ok(())
        }
        MonitorCommand::Restart { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.stop(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            deployer.start(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("monitor stack restarted on '{target}'");
            Ok(())
        }
    }
}

fn parse_labels(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut labels = HashMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| ExitError::bad_args(format!("label '{entry}' is not in key=value form")))?;
        labels.insert(key.to_string(), value.to_string());
    }
    Ok(labels)
}
