//! Cleanup progress tracking
//!
//! Older examples still carry free-form metadata comments
//! (`snippet-sourcedescription:[...]` and friends) that the YAML metadata
//! replaced. The report counts, per directory group, how many source files
//! are already free of them.

use crate::config::CheckinConfig;
use crate::error::Result;
use crate::walk_files;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Comment markers superseded by metadata files
pub const LEGACY_MARKERS: &[&str] = &[
    "snippet-sourcedescription",
    "snippet-service",
    "snippet-keyword",
    "snippet-sourcetype",
    "snippet-sourcedate",
    "snippet-sourceauthor",
    "snippet-sourcesyntax",
    "snippet-comment",
];

pub fn is_legacy(content: &str) -> bool {
    LEGACY_MARKERS.iter().any(|m| content.contains(m))
}

/// Group key: the first `depth` directories of a relative path, or `.` for
/// files above that
pub fn group_key(rel: &str, depth: usize) -> String {
    let dirs: Vec<&str> = rel.split('/').collect();
    let dirs = &dirs[..dirs.len().saturating_sub(1)];
    if dirs.is_empty() || depth == 0 {
        return ".".to_string();
    }
    dirs[..depth.min(dirs.len())].join("/")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupProgress {
    pub group: String,
    pub total: usize,
    pub clean: usize,
    pub legacy: usize,
}

impl GroupProgress {
    pub fn percent_clean(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.clean as f64 * 100.0 / self.total as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub date: NaiveDate,
    pub groups: Vec<GroupProgress>,
}

impl ProgressReport {
    /// Sum over all groups
    pub fn totals(&self) -> GroupProgress {
        self.groups.iter().fold(
            GroupProgress {
                group: "total".to_string(),
                ..Default::default()
            },
            |mut acc, g| {
                acc.total += g.total;
                acc.clean += g.clean;
                acc.legacy += g.legacy;
                acc
            },
        )
    }
}

/// Count clean and legacy source files under `root`, grouped by directory
pub fn progress_report(root: &Path, depth: usize, config: &CheckinConfig) -> Result<ProgressReport> {
    let mut groups: BTreeMap<String, GroupProgress> = BTreeMap::new();

    for (path, rel) in walk_files(root, config)? {
        if !config.checks_contents(&path) {
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping {}: {}", rel, e);
                continue;
            }
        };

        let key = group_key(&rel, depth);
        let entry = groups.entry(key.clone()).or_insert_with(|| GroupProgress {
            group: key,
            ..Default::default()
        });
        entry.total += 1;
        if is_legacy(&content) {
            debug!("{} has legacy markers", rel);
            entry.legacy += 1;
        } else {
            entry.clean += 1;
        }
    }

    let report = ProgressReport {
        date: Local::now().date_naive(),
        groups: groups.into_values().collect(),
    };
    let totals = report.totals();
    info!(
        "{} groups, {} of {} files clean",
        report.groups.len(),
        totals.clean,
        totals.total
    );
    Ok(report)
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    group: &'a str,
    total: usize,
    clean: usize,
    legacy: usize,
    percent_clean: String,
}

/// Write one CSV row per group
pub fn write_csv(report: &ProgressReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    let date = report.date.format("%Y-%m-%d").to_string();
    for group in &report.groups {
        writer.serialize(CsvRow {
            date: date.clone(),
            group: &group.group,
            total: group.total,
            clean: group.clean,
            legacy: group.legacy,
            percent_clean: format!("{:.1}", group.percent_clean()),
        })?;
    }
    writer.flush()?;
    info!("Wrote progress for {} groups to {}", report.groups.len(), path.display());
    Ok(())
}
