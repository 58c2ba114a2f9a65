// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Retention GC: delete data-lake subdirectories older than a
//! profile's retention window. Grounded on
//! `original_source/core/data_lake/cleaner.py::RetentionCleaner`,
//! including its four date-token extraction patterns and their
//! priority order.

use chrono::{DateTime, NaiveDate, Utc};
use fleet_core::Clock;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// Allow expect here as these regexes are compile-time verified to be valid.
#[allow(clippy::expect_used)]
fn date_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            (Regex::new(r"_(\d{8})$").expect("valid regex"), "%Y%m%d"),
            (Regex::new(r"^(\d{8})$").expect("valid regex"), "%Y%m%d"),
            (
                Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("valid regex"),
                "%Y-%m-%d",
            ),
            (
                Regex::new(r"(\d{4}_\d{2}_\d{2})").expect("valid regex"),
                "%Y_%m_%d",
            ),
        ]
    })
}

/// Extract a date from a directory name such as `gate_io_20241128`,
/// `20241128`, `2024-11-28`, or `2024_11_28`, trying patterns in that
/// priority order and returning the first that parses.
pub fn extract_date_from_dirname(dirname: &str) -> Option<NaiveDate> {
    for (pattern, format) in date_patterns() {
        if let Some(captures) = pattern.captures(dirname) {
            let date_str = captures.get(1)?.as_str();
            if let Ok(date) = NaiveDate::parse_from_str(date_str, format) {
                return Some(date);
            }
        }
    }
    None
}

#[derive(Debug, Clone, Default)]
pub struct RetentionResult {
    pub deleted_dirs: u64,
    pub deleted_files: u64,
    pub freed_bytes: u64,
    pub deleted_paths: Vec<PathBuf>,
}

/// Recursively sum the file count and total size of everything under
/// `root` (spec.md §4.D step 4: "accumulate {size, file count} by
/// recursive walk" before deleting). Permission errors are skipped,
/// not fatal -- matching the GC's overall "log and skip" edge policy.
fn walk_size(root: &Path) -> (u64, u64) {
    let mut files = 0u64;
    let mut bytes = 0u64;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            match entry.file_type() {
                Ok(ft) if ft.is_dir() => stack.push(path),
                Ok(ft) if ft.is_file() => {
                    files += 1;
                    bytes += entry.metadata().map(|m| m.len()).unwrap_or(0);
                }
                _ => {}
            }
        }
    }
    (files, bytes)
}

/// Deletes data-lake subdirectories whose name-encoded date is older
/// than `retention_days`. A directory with no parseable date is left
/// alone -- the original never deletes what it cannot date.
#[derive(Debug, Clone)]
pub struct RetentionGc<C: Clock> {
    clock: C,
}

impl<C: Clock> RetentionGc<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn collect(&self, local_path: &Path, retention_days: u32) -> RetentionResult {
        if !local_path.exists() {
            return RetentionResult::default();
        }
        let cutoff = self.cutoff_date(retention_days);
        let mut result = RetentionResult::default();

        let entries = match std::fs::read_dir(local_path) {
            Ok(entries) => entries,
            Err(_) => return result,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if let Some(dir_date) = extract_date_from_dirname(name) {
                if dir_date < cutoff {
                    let (files, bytes) = walk_size(&path);
                    result.deleted_files += files;
                    result.freed_bytes += bytes;
                    result.deleted_paths.push(path);
                }
            }
        }
        result.deleted_dirs = result.deleted_paths.len() as u64;
        result
    }

    /// Delete the directories `collect` identified as expired.
    pub fn run(&self, local_path: &Path, retention_days: u32) -> std::io::Result<RetentionResult> {
        let result = self.collect(local_path, retention_days);
        for path in &result.deleted_paths {
            std::fs::remove_dir_all(path)?;
        }
        Ok(result)
    }

    fn cutoff_date(&self, retention_days: u32) -> NaiveDate {
        let now: DateTime<Utc> = self.clock.now();
        (now - chrono::Duration::days(retention_days as i64)).date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fleet_core::FakeClock;
    use tempfile::tempdir;
    use yare::parameterized;

    #[parameterized(
        exchange_symbol_suffix = { "gate_io_VIRTUAL-USDT_20241128", Some((2024, 11, 28)) },
        bare_compact = { "20241128", Some((2024, 11, 28)) },
        dashed = { "2024-11-28", Some((2024, 11, 28)) },
        underscored = { "2024_11_28", Some((2024, 11, 28)) },
        unparseable = { "notes", None },
    )]
    fn extracts_known_date_formats(dirname: &str, expected: Option<(i32, u32, u32)>) {
        let got = extract_date_from_dirname(dirname);
        let expected = expected.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).expect("valid date"));
        assert_eq!(got, expected);
    }

    #[test]
    fn collects_only_directories_older_than_cutoff() {
        let dir = tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("gate_io_20200101")).expect("mkdir");
        std::fs::create_dir(dir.path().join("gate_io_20260101")).expect("mkdir");

        let clock = FakeClock::new(Utc.with_ymd_and_hms(2026, 7, 27, 0, 0, 0).unwrap());
        let gc = RetentionGc::new(clock);
        let result = gc.collect(dir.path(), 30);

        assert_eq!(result.deleted_dirs, 1);
        assert!(result.deleted_paths[0].ends_with("gate_io_20200101"));
    }

    #[test]
    fn accumulates_file_count_and_size_before_deleting() {
        let dir = tempdir().expect("tempdir");
        let expired = dir.path().join("gate_io_20200101");
        std::fs::create_dir(&expired).expect("mkdir");
        std::fs::write(expired.join("a.bin"), vec![0u8; 100]).expect("write");
        let nested = expired.join("nested");
        std::fs::create_dir(&nested).expect("mkdir");
        std::fs::write(nested.join("b.bin"), vec![0u8; 50]).expect("write");

        let clock = FakeClock::new(Utc.with_ymd_and_hms(2026, 7, 27, 0, 0, 0).unwrap());
        let gc = RetentionGc::new(clock);
        let result = gc.collect(dir.path(), 30);

        assert_eq!(result.deleted_files, 2);
        assert_eq!(result.freed_bytes, 150);
        assert!(expired.exists(), "collect() must not delete, only report");
    }

    #[test]
    fn retention_days_one_with_all_dirs_dated_today_deletes_nothing() {
        let dir = tempdir().expect("tempdir");
        let today = Utc.with_ymd_and_hms(2026, 7, 27, 0, 0, 0).unwrap();
        std::fs::create_dir(dir.path().join(format!("exchange_symbol_{}", today.format("%Y%m%d"))))
            .expect("mkdir");

        let clock = FakeClock::new(today);
        let gc = RetentionGc::new(clock);
        let result = gc.collect(dir.path(), 1);

        assert_eq!(result.deleted_dirs, 0);
    }

    #[test]
    fn missing_directory_collects_nothing() {
        let clock = FakeClock::new(Utc::now());
        let gc = RetentionGc::new(clock);
        let result = gc.collect(Path::new("/nonexistent/path/xyz"), 30);
        assert_eq!(result.deleted_dirs, 0);
    }
}
