//! Exit-code contract of spec.md §6: 0 success, 1 generic failure,
//! 2 bad arguments/missing required fields.

use crate::prelude::*;
use tempfile::tempdir;

#[test]
fn missing_config_file_exits_with_bad_args_code() {
    cli()
        .args(&["infra", "list", "--config", "/nonexistent/environment.yml"])
        .fails_with_code(2)
        .stderr_has("failed to read");
}

#[test]
fn environment_referencing_unknown_security_host_is_config_invalid() {
    let dir = tempdir().expect("tempdir");
    let body = VALID_ENVIRONMENT.replace("instances: [bot-1]", "instances: [ghost-host]");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, body).expect("write");

    cli()
        .args(&["infra", "list", "--config", config.to_str().unwrap()])
        .fails_with_code(2);
}

#[test]
fn infra_info_for_unknown_host_is_bad_args() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");

    cli()
        .args(&["infra", "info", "--config", config.to_str().unwrap(), "--name", "ghost-host"])
        .fails_with_code(2)
        .stderr_has("no infrastructure host named");
}

#[test]
fn security_setup_for_host_outside_security_instances_is_bad_args() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");

    cli()
        .args(&[
            "security",
            "setup",
            "--config",
            config.to_str().unwrap(),
            "--name",
            "not-declared",
        ])
        .fails_with_code(2)
        .stderr_has("not listed under security.instances");
}

#[test]
fn data_lake_sync_with_no_profile_and_no_all_is_bad_args() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("data_lake.yml");
    let body = VALID_DATA_LAKE.replace("{ROOT}", &dir.path().join("lake").display().to_string());
    std::fs::write(&config, body).expect("write");

    cli()
        .args(&["data-lake", "sync", "--config", config.to_str().unwrap()])
        .fails_with_code(2)
        .stderr_has("specify a PROFILE name or pass --all");
}

#[test]
fn data_lake_invalid_retention_days_is_config_invalid() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("data_lake.yml");
    let body = VALID_DATA_LAKE
        .replace("{ROOT}", &dir.path().join("lake").display().to_string())
        .replace("retention_days: 30", "retention_days: 0");
    std::fs::write(&config, body).expect("write");

    cli()
        .args(&["data-lake", "validate", "--config", config.to_str().unwrap()])
        .fails_with_code(2);
}
