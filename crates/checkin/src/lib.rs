//! Repository hygiene checks
//!
//! `run_checks` walks a repository and applies the lint rules in [`rules`]
//! to every file: file name and size checks everywhere, content checks
//! (denied words, credential-shaped strings, snippet markers) on source
//! files. [`progress`] reports how far the migration away from legacy
//! metadata comments has come.

pub mod config;
mod error;
pub mod progress;
pub mod rules;

pub use config::CheckinConfig;
pub use error::{CheckinError, Result};
pub use progress::{progress_report, write_csv, GroupProgress, ProgressReport};
pub use rules::Violation;

use docgen_common::relative_path;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of a lint run
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub files_checked: usize,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Every file under `root` outside ignored directories and files, with its
/// repository-relative path
pub(crate) fn walk_files(root: &Path, config: &CheckinConfig) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.depth() > 0
                && e.file_type().is_dir()
                && e.file_name().to_str().is_some_and(|n| config.is_ignored_dir(n)))
        });

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = relative_path(root, entry.path());
        if config.is_ignored_file(&rel) {
            debug!("Ignoring {}", rel);
            continue;
        }
        files.push((entry.into_path(), rel));
    }
    Ok(files)
}

/// Lint every file under `root`
pub fn run_checks(root: &Path, config: &CheckinConfig) -> Result<CheckReport> {
    let mut report = CheckReport::default();

    for (path, rel) in walk_files(root, config)? {
        report.files_checked += 1;
        report.violations.extend(rules::check_file_name(&rel));

        let size = fs::metadata(&path)?.len();
        if let Some(violation) = rules::check_file_size(&rel, size, config) {
            report.violations.push(violation);
            continue;
        }

        if !config.checks_contents(&path) {
            continue;
        }
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping contents of {}: {}", rel, e);
                continue;
            }
        };
        report
            .violations
            .extend(rules::check_contents(&rel, &content, config));
    }

    info!(
        "Checked {} files, {} violations",
        report.files_checked,
        report.violations.len()
    );
    Ok(report)
}
