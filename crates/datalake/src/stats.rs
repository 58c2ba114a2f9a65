// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Fleet Orchestration contributors

//! Per-profile statistics, grounded on
//! `original_source/core/data_lake/stats.py::StatsCollector`.

use crate::retention::extract_date_from_dirname;
use fleet_core::{Checkpoint, Profile};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileStats {
    pub profile_name: String,
    pub local_path: String,
    pub remote_source: String,
    pub exists: bool,
    pub total_size_bytes: u64,
    pub total_size_human: String,
    pub file_count: u64,
    pub dir_count: u64,
    pub earliest_date: Option<String>,
    pub latest_date: Option<String>,
    pub last_sync_time: Option<String>,
    pub last_sync_status: Option<String>,
    pub retention_days: u32,
}

/// Render a byte count as a human-readable size (spec.md §4.F
/// "total-size (+ human)"), matching
/// `original_source/core/data_lake/stats.py::_human_size`'s
/// 1024-based unit ladder.
fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[unit])
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

/// Collect size, file/dir counts, and the date range encoded in a
/// profile's subdirectory names.
pub fn collect(profile: &Profile, local_path: &Path, checkpoint: Option<&Checkpoint>) -> ProfileStats {
    let remote_source = format!(
        "{}@{}:{}",
        profile.source.user, profile.source.host, profile.source.remote_root
    );

    if !local_path.exists() {
        return ProfileStats {
            profile_name: profile.name.clone(),
            local_path: local_path.display().to_string(),
            remote_source,
            exists: false,
            total_size_bytes: 0,
            total_size_human: human_size(0),
            file_count: 0,
            dir_count: 0,
            earliest_date: None,
            latest_date: None,
            last_sync_time: checkpoint.map(|c| c.last_sync_time.to_rfc3339()),
            last_sync_status: checkpoint.map(|c| format!("{:?}", c.last_sync_status)),
            retention_days: profile.retention_days,
        };
    }

    let (total_size_bytes, file_count, dir_count) = walk_dir_stats(local_path);
    let (earliest_date, latest_date) = date_range(local_path);

    ProfileStats {
        profile_name: profile.name.clone(),
        local_path: local_path.display().to_string(),
        remote_source,
        exists: true,
        total_size_bytes,
        total_size_human: human_size(total_size_bytes),
        file_count,
        dir_count,
        earliest_date,
        latest_date,
        last_sync_time: checkpoint.map(|c| c.last_sync_time.to_rfc3339()),
        last_sync_status: checkpoint.map(|c| format!("{:?}", c.last_sync_status)),
        retention_days: profile.retention_days,
    }
}

fn walk_dir_stats(root: &Path) -> (u64, u64, u64) {
    let mut total_size = 0u64;
    let mut file_count = 0u64;
    let mut dir_count = 0u64;
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                dir_count += 1;
                stack.push(path);
            } else if let Ok(metadata) = entry.metadata() {
                file_count += 1;
                total_size += metadata.len();
            }
        }
    }
    (total_size, file_count, dir_count)
}

// Allow expect here: the early `is_empty` return guarantees `dates`
// is non-empty by the time `first`/`last` are called.
#[allow(clippy::expect_used)]
fn date_range(root: &Path) -> (Option<String>, Option<String>) {
    let mut dates = Vec::new();
    if let Ok(entries) = std::fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if let Some(date) = extract_date_from_dirname(name) {
                    dates.push(date);
                }
            }
        }
    }
    if dates.is_empty() {
        return (None, None);
    }
    dates.sort();
    (
        Some(dates.first().expect("non-empty").to_string()),
        Some(dates.last().expect("non-empty").to_string()),
    )
}
