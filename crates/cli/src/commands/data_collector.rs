// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet data-collector` -- deploy and operate a per-exchange
//! orderbook/tick collector (spec.md §4.F).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_core::env_spec::ServiceKind;
use fleet_services::{CollectorConfig, DataCollectorDeployer, Deployer};

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct DataCollectorArgs {
    #[command(subcommand)]
    command: DataCollectorCommand,
}

#[derive(Subcommand)]
enum DataCollectorCommand {
    Deploy {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    Start {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    Stop {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        target: String,
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
}

async fn deployer_for(
    remote: &RemoteArgs,
    spec: &fleet_core::EnvironmentSpec,
    target: &str,
) -> Result<(fleet_core::Host, DataCollectorDeployer<fleet_remote::SshSession>)> {
    let provisioner = remote.provisioner();
    let host = common::resolve_host(&provisioner, spec, target).await?;
    let item = common::find_service_item(spec, ServiceKind::DataCollector, target).ok_or_else(|| {
        ExitError::bad_args(format!("no data-collector service targets '{target}' in this spec"))
    })?;
    let config: CollectorConfig = common::collector_config(&item.config)?;
    let deployer = DataCollectorDeployer::new(remote.adapter(), &remote.playbook_dir, config);
    Ok((host, deployer))
}

pub async fn handle(args: DataCollectorArgs) -> Result<()> {
    match args.command {
        DataCollectorCommand::Deploy { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.deploy(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("data collector deployed to '{target}'");
            Ok(())
        }
        DataCollectorCommand::Start { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.start(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("data collector started on '{target}'");
            Ok(())
        }
        DataCollectorCommand::Stop { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.stop(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("data collector stopped on '{target}'");
            Ok(())
        }
        DataCollectorCommand::Restart { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.stop(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            deployer.start(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("data collector restarted on '{target}'");
            Ok(())
        }
        DataCollectorCommand::Status { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let report = deployer.health_check(&host).await;
            println!("{target}: {:?} -- {}", report.status, report.message);
            Ok(())
        }
        DataCollectorCommand::Logs { config, target, lines, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let logs = deployer
                .get_logs(&host, lines)
                .await
                .map_err(|e| ExitError::generic(e.to_string()))?;
            print!("{logs}");
            Ok(())
        }
    }
}
