// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet infra` -- create/destroy/list/info/manage infrastructure
//! hosts. spec.md §1 excludes cloud-SDK wrappers, so "live" state here
//! means whatever the provisioner hook's idempotent `provision` call
//! reports; there is no separate instance database (spec.md
//! Non-goals).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_orchestrator::ProvisionerHook;

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct InfraArgs {
    #[command(subcommand)]
    command: InfraCommand,
}

#[derive(Subcommand)]
enum InfraCommand {
    /// Provision (or re-resolve, idempotently) a named host.
    Create {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Tear down a named host.
    Destroy {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// List every host declared in the Environment Spec.
    List {
        #[arg(long)]
        config: PathBuf,
    },
    /// Show the declared spec for one host.
    Info {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: String,
    },
    /// Re-resolve a host against the provisioner hook (idempotent
    /// reconcile: no new infrastructure is created if it already
    /// exists under the given name).
    Manage {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: String,
        #[command(flatten)]
        remote: RemoteArgs,
    },
}

pub async fn handle(args: InfraArgs) -> Result<()> {
    match args.command {
        InfraCommand::Create { config, name, remote } => {
            let spec = common::load_environment(&config)?;
            let host = common::resolve_host(&remote.provisioner(), &spec, &name).await?;
            println!("{}", serde_json::to_string_pretty(&HostView::from(&host))?);
            Ok(())
        }
        InfraCommand::Destroy { config, name, remote } => {
            let spec = common::load_environment(&config)?;
            let provisioner = remote.provisioner();
            let host = common::resolve_host(&provisioner, &spec, &name).await?;
            provisioner
                .destroy(&host)
                .await
                .map_err(|e| ExitError::generic(e.to_string()))?;
            println!("destroyed '{name}'");
            Ok(())
        }
        InfraCommand::List { config } => {
            let spec = common::load_environment(&config)?;
            for host in &spec.infrastructure {
                println!("{}\t{}\t{}", host.name, host.blueprint, host.bundle);
            }
            Ok(())
        }
        InfraCommand::Info { config, name } => {
            let spec = common::load_environment(&config)?;
            let host_spec = spec
                .find_infrastructure_host(&name)
                .ok_or_else(|| ExitError::bad_args(format!("no infrastructure host named '{name}'")))?;
            println!("{}", serde_json::to_string_pretty(host_spec)?);
            Ok(())
        }
        InfraCommand::Manage { config, name, remote } => {
            let spec = common::load_environment(&config)?;
            let host = common::resolve_host(&remote.provisioner(), &spec, &name).await?;
            println!("{}", serde_json::to_string_pretty(&HostView::from(&host))?);
            Ok(())
        }
    }
}

#[derive(serde::Serialize)]
struct HostView {
    name: String,
    public_address: String,
    overlay_address: Option<String>,
    ssh_user: String,
    ssh_port: u16,
}

impl From<&fleet_core::Host> for HostView {
    fn from(host: &fleet_core::Host) -> Self {
        Self {
            name: host.name.clone(),
            public_address: host.public_address.clone(),
            overlay_address: host.overlay_address.clone(),
            ssh_user: host.ssh_user.clone(),
            ssh_port: host.ssh_port,
        }
    }
}
