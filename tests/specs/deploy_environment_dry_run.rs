//! Plan phase dry-run (spec.md §4.J phase 1): emits the plan and
//! performs no mutating work.

use crate::prelude::*;
use tempfile::tempdir;

#[test]
fn dry_run_emits_one_item_per_phase_in_order() {
    let dir = tempdir().expect("tempdir");
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, VALID_ENVIRONMENT).expect("write");

    let assert = cli()
        .args(&["deploy-environment", "--config", config.to_str().unwrap(), "--dry-run"])
        .passes();

    let stdout = assert.stdout();
    let provision_idx = stdout.find("[provision]").expect("a provision item");
    let secure_idx = stdout.find("[secure]").expect("a secure item");
    let service_idx = stdout.find("[service]").expect("a service item");
    let summarize_idx = stdout.find("[summarize]").expect("a summarize item");

    assert!(provision_idx < secure_idx, "provision must precede secure");
    assert!(secure_idx < service_idx, "secure must precede service");
    assert!(service_idx < summarize_idx, "service must precede summarize");
    assert!(stdout.contains("bot-1"));
}

#[test]
fn dry_run_vpn_adds_a_second_secure_item_per_host() {
    let dir = tempdir().expect("tempdir");
    let body = VALID_ENVIRONMENT.replacen("  ssh:", "  vpn_network: 100.64.0.0/10\n  ssh:", 1);
    let config = dir.path().join("environment.yml");
    std::fs::write(&config, body).expect("write");

    let assert = cli()
        .args(&["deploy-environment", "--config", config.to_str().unwrap(), "--dry-run"])
        .passes();

    let secure_items = assert.stdout().matches("[secure]").count();
    assert_eq!(secure_items, 2, "one hardening item plus one VPN firewall item per host");
}
