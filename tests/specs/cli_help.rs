//! CLI help and usage output (spec.md §6's top-level command grammar).

use crate::prelude::*;

#[test]
fn fleet_no_args_is_a_usage_error() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn fleet_help_shows_every_top_level_command() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("deploy-environment")
        .stdout_has("infra")
        .stdout_has("security")
        .stdout_has("monitor")
        .stdout_has("data-collector")
        .stdout_has("freqtrade")
        .stdout_has("data-lake");
}

#[test]
fn fleet_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}

#[test]
fn infra_help_shows_subcommands() {
    cli()
        .args(&["infra", "--help"])
        .passes()
        .stdout_has("create")
        .stdout_has("destroy")
        .stdout_has("list")
        .stdout_has("info")
        .stdout_has("manage");
}

#[test]
fn data_lake_help_shows_subcommands() {
    cli()
        .args(&["data-lake", "--help"])
        .passes()
        .stdout_has("sync")
        .stdout_has("stats")
        .stdout_has("cleanup")
        .stdout_has("validate")
        .stdout_has("test-connection");
}

#[test]
fn security_help_shows_subcommands() {
    cli()
        .args(&["security", "--help"])
        .passes()
        .stdout_has("setup")
        .stdout_has("status");
}
