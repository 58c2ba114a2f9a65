// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! fleet - drives the fleet orchestration engine directly as a library
//! (no daemon, no IPC client): provisioning, security hardening,
//! service deployment, and data-lake sync, per spec.md §6's CLI
//! grammar.

mod commands;
mod exit_error;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{data_collector, data_lake, deploy_environment, freqtrade, infra, monitor, security};

#[derive(Parser)]
#[command(name = "fleet", version, about = "Fleet orchestration engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full Plan -> Provision -> Secure -> Service -> Summarize
    /// pipeline for one Environment Spec.
    DeployEnvironment(deploy_environment::DeployEnvironmentArgs),
    /// Create, destroy, list, or inspect infrastructure hosts.
    Infra(infra::InfraArgs),
    /// Harden hosts via the Security Pipeline, or inspect their state.
    Security(security::SecurityArgs),
    /// Manage the monitoring stack (Prometheus/Grafana/Alertmanager).
    Monitor(monitor::MonitorArgs),
    /// Manage a per-exchange orderbook/tick collector.
    DataCollector(data_collector::DataCollectorArgs),
    /// Manage a Freqtrade trading bot container.
    Freqtrade(freqtrade::FreqtradeArgs),
    /// Sync, inspect, or clean up data-lake profiles.
    DataLake(data_lake::DataLakeArgs),
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        let code = exit_error::code_for(&err);
        eprintln!("Error: {err:#}");
        std::process::exit(code);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::DeployEnvironment(args) => deploy_environment::handle(args).await,
        Commands::Infra(args) => infra::handle(args).await,
        Commands::Security(args) => security::handle(args).await,
        Commands::Monitor(args) => monitor::handle(args).await,
        Commands::DataCollector(args) => data_collector::handle(args).await,
        Commands::Freqtrade(args) => freqtrade::handle(args).await,
        Commands::DataLake(args) => data_lake::handle(args).await,
    }
}
