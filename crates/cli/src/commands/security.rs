// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! `fleet security` -- run the Security Pipeline (spec.md §4.I)
//! against already-provisioned hosts outside of a full
//! `deploy-environment` run, or inspect their current hardening state.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use fleet_orchestrator::phases;
use tokio_util::sync::CancellationToken;

use crate::commands::common::{self, RemoteArgs};
use crate::exit_error::ExitError;

#[derive(Args)]
pub struct SecurityArgs {
    #[command(subcommand)]
    command: SecurityCommand,
}

#[derive(Subcommand)]
enum SecurityCommand {
    /// Run steps 1-7 against every `security.instances` host (or just
    /// `--name`, if given).
    Setup {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        remote: RemoteArgs,
    },
    /// Run step 7 (verify) only, without running any hardening work.
    Status {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        remote: RemoteArgs,
    },
}

pub async fn handle(args: SecurityArgs) -> Result<()> {
    match args.command {
        SecurityCommand::Setup { config, name, remote } => setup(config, name, remote).await,
        SecurityCommand::Status { config, name, remote } => status(config, name, remote).await,
    }
}

fn instance_names(spec: &fleet_core::EnvironmentSpec, name: Option<&str>) -> Result<Vec<String>> {
    match name {
        Some(name) => {
            if !spec.security.instances.iter().any(|i| i == name) {
                return Err(ExitError::bad_args(format!(
                    "'{name}' is not listed under security.instances"
                )));
            }
            Ok(vec![name.to_string()])
        }
        None => Ok(spec.security.instances.clone()),
    }
}

async fn resolve_hosts(
    remote: &RemoteArgs,
    spec: &fleet_core::EnvironmentSpec,
    names: &[String],
) -> Result<HashMap<String, fleet_core::Host>> {
    let provisioner = remote.provisioner();
    let mut hosts = HashMap::new();
    for name in names {
        let host = common::resolve_host(&provisioner, spec, name).await?;
        hosts.insert(name.clone(), host);
    }
    Ok(hosts)
}

async fn setup(config: PathBuf, name: Option<String>, remote: RemoteArgs) -> Result<()> {
    let spec = common::load_environment(&config)?;
    let names = instance_names(&spec, name.as_deref())?;
    let mut hosts = resolve_hosts(&remote, &spec, &names).await?;

    let adapter = remote.adapter();
    let pipeline = remote.pipeline(adapter);
    let cooldown = remote.cooldown();
    let cancel = CancellationToken::new();

    let outcomes = phases::run_secure_phase(
        &pipeline,
        &cooldown,
        &mut hosts,
        &names,
        |instance| spec.security_config_for(instance),
        spec.security.vpn_network.is_some(),
        &cancel,
    )
    .await;

    let mut all_ok = true;
    for outcome in &outcomes {
        let line = match &outcome.status {
            phases::PhaseStatus::Success => "ok".to_string(),
            phases::PhaseStatus::Failed(message) => {
                all_ok = false;
                format!("FAILED: {message}")
            }
            phases::PhaseStatus::Cancelled => {
                all_ok = false;
                "cancelled".to_string()
            }
        };
        println!("{:<20} {}", outcome.host, line);
    }

    if all_ok {
        Ok(())
    } else {
        Err(ExitError::generic("security setup did not complete successfully for every host"))
    }
}

async fn status(config: PathBuf, name: Option<String>, remote: RemoteArgs) -> Result<()> {
    let spec = common::load_environment(&config)?;
    let names = instance_names(&spec, name.as_deref())?;
    let hosts = resolve_hosts(&remote, &spec, &names).await?;

    let adapter = remote.adapter();
    let pipeline = remote.pipeline(adapter);

    for instance in &names {
        let host = &hosts[instance];
        let config = spec.security_config_for(instance);
        let report = pipeline
            .step7_verify(host, &config)
            .await
            .map_err(|e| ExitError::generic(e.to_string()))?;
        println!("{instance}: {report:?}");
    }
    Ok(())
}
