//! `data-lake validate`/`stats` against a well-formed config, with no
//! remote host or local sync having ever run (spec.md §4.F "Missing
//! local dir returns an exists=false shell record without failing").

use crate::prelude::*;
use tempfile::tempdir;

fn write_data_lake_config(dir: &std::path::Path) -> std::path::PathBuf {
    let config = dir.join("data_lake.yml");
    let body = VALID_DATA_LAKE.replace("{ROOT}", &dir.join("lake").display().to_string());
    std::fs::write(&config, body).expect("write");
    config
}

#[test]
fn validate_reports_the_loaded_profile_count() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path());

    cli()
        .args(&["data-lake", "validate", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("1 profile(s)");
}

#[test]
fn stats_for_an_unsynced_profile_reports_exists_false() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path());

    let assert = cli()
        .args(&["data-lake", "stats", "gate-io", "--config", config.to_str().unwrap()])
        .passes();

    let stdout = assert.stdout();
    assert!(stdout.contains("\"exists\": false"));
    assert!(stdout.contains("\"file_count\": 0"));
}

#[test]
fn stats_for_unknown_profile_is_bad_args() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path());

    cli()
        .args(&["data-lake", "stats", "ghost-profile", "--config", config.to_str().unwrap()])
        .fails_with_code(2)
        .stderr_has("no data-lake profile named");
}

#[test]
fn stats_all_iterates_every_enabled_profile() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path());

    cli()
        .args(&["data-lake", "stats", "--all", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("gate-io");
}
