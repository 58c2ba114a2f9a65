//! `infra create`/`destroy`/`list`/`info` against a scripted
//! provisioner hook (spec.md §1: cloud-SDK wrappers are out of scope,
//! so the provisioner is always an external, opaque collaborator).

use crate::prelude::*;
use tempfile::tempdir;

#[test]
fn infra_list_prints_every_declared_host() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");

    cli()
        .args(&["infra", "list", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("bot-1")
        .stdout_has("ubuntu-22")
        .stdout_has("medium");
}

#[test]
fn infra_info_prints_the_declared_host_spec() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");

    cli()
        .args(&["infra", "info", "--config", config.to_str().unwrap(), "--name", "bot-1"])
        .passes()
        .stdout_has("ubuntu-22");
}

#[test]
fn infra_create_resolves_a_host_through_the_provisioner_script() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");
    let provisioner = write_fake_provisioner(dir.path());

    cli()
        .args(&[
            "infra",
            "create",
            "--config",
            config.to_str().unwrap(),
            "--name",
            "bot-1",
            "--provisioner-script",
            provisioner.to_str().unwrap(),
        ])
        .passes()
        .stdout_has("10.0.0.9")
        .stdout_has("\"ssh_port\": 22");
}

#[test]
fn infra_destroy_succeeds_against_the_provisioner_script() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");
    let provisioner = write_fake_provisioner(dir.path());

    cli()
        .args(&[
            "infra",
            "destroy",
            "--config",
            config.to_str().unwrap(),
            "--name",
            "bot-1",
            "--provisioner-script",
            provisioner.to_str().unwrap(),
        ])
        .passes()
        .stdout_has("destroyed 'bot-1'");
}

#[test]
fn infra_create_surfaces_a_failing_provisioner_script_as_generic_failure() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");
    let broken = dir.path().join("broken-provisioner.sh");
    std::fs::write(&broken, "#!/bin/sh\necho 'boom' >&2\nexit 1\n").expect("write");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&broken, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    }

    cli()
        .args(&[
            "infra",
            "create",
            "--config",
            config.to_str().unwrap(),
            "--name",
            "bot-1",
            "--provisioner-script",
            broken.to_str().unwrap(),
        ])
        .fails_with_code(1)
        .stderr_has("boom");
}
