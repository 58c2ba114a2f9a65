// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet freqtrade` -- deploy and operate a Freqtrade trading bot
//! container (spec.md §4.H).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_core::env_spec::ServiceKind;
use fleet_services::{Deployer, FreqtradeDeployer};

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct FreqtradeArgs {
    #[command(subcommand)]
    command: FreqtradeCommand,
}

#[derive(Subcommand)]
enum FreqtradeCommand {
    Deploy {
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
    Restart {
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
) -> Result<(fleet_core::Host, FreqtradeDeployer<fleet_remote::SshSession>)> {
    let provisioner = remote.provisioner();
    let host = common::resolve_host(&provisioner, spec, target).await?;
    let item = common::find_service_item(spec, ServiceKind::Freqtrade, target)
        .ok_or_else(|| ExitError::bad_args(format!("no freqtrade service targets '{target}' in this spec")))?;
    let config = common::freqtrade_config(&item.config)?;
    let deployer = FreqtradeDeployer::new(remote.adapter(), &remote.playbook_dir, config);
    Ok((host, deployer))
}

pub async fn handle(args: FreqtradeArgs) -> Result<()> {
    match args.command {
        FreqtradeCommand::Deploy { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.deploy(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("freqtrade bot deployed to '{target}'");
            Ok(())
        }
        FreqtradeCommand::Status { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            let report = deployer.health_check(&host).await;
            println!("{target}: {:?} -- {}", report.status, report.message);
            Ok(())
        }
        FreqtradeCommand::Restart { config, target, remote } => {
            let spec = common::load_environment(&config)?;
            let (host, deployer) = deployer_for(&remote, &spec, &target).await?;
            deployer.stop(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            deployer.start(&host).await.map_err(|e| ExitError::generic(e.to_string()))?;
            println!("freqtrade bot restarted on '{target}'");
            Ok(())
        }
        FreqtradeCommand::Logs { config, target, lines, remote } => {
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
