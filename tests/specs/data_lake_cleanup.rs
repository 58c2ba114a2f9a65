//! `data-lake cleanup` retention GC, driven end-to-end through the CLI
//! against a local tree with an old and a fresh dated directory
//! (spec.md §8 scenario 3 "Retention dry-run").

use crate::prelude::*;
use chrono::Utc;
use tempfile::tempdir;

fn write_data_lake_config(dir: &std::path::Path, retention_days: u32) -> std::path::PathBuf {
    let config = dir.join("data_lake.yml");
    let body = VALID_DATA_LAKE
        .replace("{ROOT}", &dir.join("lake").display().to_string())
        .replace("retention_days: 30", &format!("retention_days: {retention_days}"));
    std::fs::write(&config, body).expect("write");
    config
}

#[test]
fn dry_run_cleanup_leaves_both_directories_in_place() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path(), 30);

    let lake_subdir = dir.path().join("lake").join("gate_io");
    let today = Utc::now().format("%Y%m%d").to_string();
    let old_dir = lake_subdir.join("exchange_symbol_20200101");
    let fresh_dir = lake_subdir.join(format!("exchange_symbol_{today}"));
    std::fs::create_dir_all(&old_dir).expect("mkdir");
    std::fs::create_dir_all(&fresh_dir).expect("mkdir");
    std::fs::write(old_dir.join("f"), b"x").expect("write");
    std::fs::write(fresh_dir.join("f"), b"x").expect("write");

    let assert = cli()
        .args(&["data-lake", "cleanup", "gate-io", "--config", config.to_str().unwrap(), "--dry-run"])
        .passes();

    assert!(assert.stdout().contains("deleted_dirs=1"));
    assert!(old_dir.exists(), "dry-run must not delete the expired directory");
    assert!(fresh_dir.exists(), "dry-run must not touch the fresh directory");
}

#[test]
fn real_cleanup_deletes_only_the_expired_directory() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path(), 30);

    let lake_subdir = dir.path().join("lake").join("gate_io");
    let today = Utc::now().format("%Y%m%d").to_string();
    let old_dir = lake_subdir.join("exchange_symbol_20200101");
    let fresh_dir = lake_subdir.join(format!("exchange_symbol_{today}"));
    std::fs::create_dir_all(&old_dir).expect("mkdir");
    std::fs::create_dir_all(&fresh_dir).expect("mkdir");

    cli()
        .args(&["data-lake", "cleanup", "gate-io", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("deleted_dirs=1");

    assert!(!old_dir.exists(), "expired directory should be gone");
    assert!(fresh_dir.exists(), "fresh directory must survive");
}

#[test]
fn retention_days_one_against_all_fresh_dirs_deletes_nothing() {
    let dir = tempdir().expect("tempdir");
    let config = write_data_lake_config(dir.path(), 1);

    let lake_subdir = dir.path().join("lake").join("gate_io");
    let today = Utc::now().format("%Y%m%d").to_string();
    let fresh_dir = lake_subdir.join(format!("exchange_symbol_{today}"));
    std::fs::create_dir_all(&fresh_dir).expect("mkdir");

    cli()
        .args(&["data-lake", "cleanup", "gate-io", "--config", config.to_str().unwrap()])
        .passes()
        .stdout_has("deleted_dirs=0");

    assert!(fresh_dir.exists());
}
