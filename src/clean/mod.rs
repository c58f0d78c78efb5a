//! Recursive cleanup of download trees.
//!
//! All operations are best-effort: a path that vanished before it could be
//! removed counts as removed, and a failure on one entry never stops the walk.
//! Deletion always runs bottom-up so a directory is only removed once its
//! entries are gone.

mod outcome;

pub use outcome::{DeletionFailure, RemovalOutcome};
pub(crate) use outcome::remove_single_file;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::blocking::run_blocking;
use crate::constants::{
    HIDDEN_FILE_PREFIX, HIDDEN_PARTS_SUFFIX, JUNK_FILE_SUFFIXES, SCRATCH_DIR_SUFFIXES,
};
use outcome::{remove_empty_dir, remove_path, remove_tree_best_effort};

/// Counters from one [`clean_unwanted`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Junk files deleted.
    pub files_removed: u64,
    /// Scratch trees and empty directories deleted.
    pub dirs_removed: u64,
    /// Removals that failed and were skipped.
    pub failures: u64,
}

impl CleanupReport {
    fn record_file(&mut self, outcome: &RemovalOutcome) {
        outcome.log_failure("remove unwanted file");
        match outcome {
            RemovalOutcome::Deleted => self.files_removed += 1,
            RemovalOutcome::AlreadyGone => {}
            RemovalOutcome::Failed(_) => self.failures += 1,
        }
    }

    fn record_dir(&mut self, outcome: &RemovalOutcome, action: &str) {
        outcome.log_failure(action);
        match outcome {
            RemovalOutcome::Deleted => self.dirs_removed += 1,
            RemovalOutcome::AlreadyGone => {}
            RemovalOutcome::Failed(_) => self.failures += 1,
        }
    }
}

/// Deletes `path` entirely: a directory recursively, anything else as a single file.
///
/// Calling this on a missing path is a no-op. Failures are logged, not returned as errors.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn clean_target(path: impl AsRef<Path>) -> RemovalOutcome {
    let path = path.as_ref().to_path_buf();
    let outcome = run_blocking(move || {
        if fs::symlink_metadata(&path).is_err() {
            return RemovalOutcome::AlreadyGone;
        }
        info!(path = %path.display(), "Cleaning target");
        remove_path(&path)
    })
    .await;
    outcome.log_failure("clean target");
    outcome
}

/// Wipes an aborted or failed download root, continuing past entries that cannot be removed.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn clean_download(path: impl AsRef<Path>) -> RemovalOutcome {
    let path = path.as_ref().to_path_buf();
    let outcome = run_blocking(move || {
        if fs::symlink_metadata(&path).is_err() {
            return RemovalOutcome::AlreadyGone;
        }
        info!(path = %path.display(), "Cleaning download");
        remove_tree_best_effort(&path)
    })
    .await;
    outcome.log_failure("clean download");
    outcome
}

/// Removes junk files, scratch directories, and then every directory left empty below `path`.
///
/// A file is junk when its name ends with an in-progress marker (`.!qB`), when its
/// full path is listed in `custom_list`, or when it is a hidden `.parts` file.
/// Directories whose names end with a scratch suffix (`.unwanted`, ...) are removed
/// with their contents. `path` itself is removed too if it ends up empty.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn clean_unwanted(path: impl AsRef<Path>, custom_list: &[PathBuf]) -> CleanupReport {
    let root = path.as_ref().to_path_buf();
    let custom: HashSet<PathBuf> = custom_list.iter().cloned().collect();
    info!(path = %root.display(), "Cleaning unwanted files/folders");
    let report = run_blocking(move || {
        let mut report = CleanupReport::default();
        remove_unwanted_entries(&root, &custom, &mut report);
        remove_empty_dirs(&root, &mut report);
        report
    })
    .await;
    debug!(
        files_removed = report.files_removed,
        dirs_removed = report.dirs_removed,
        failures = report.failures,
        "unwanted cleanup finished"
    );
    report
}

/// Returns true if a file with this name and path should be deleted by [`clean_unwanted`].
#[must_use]
pub fn is_unwanted_file(name: &str, path: &Path, custom: &HashSet<PathBuf>) -> bool {
    JUNK_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        || custom.contains(path)
        || (name.ends_with(HIDDEN_PARTS_SUFFIX) && name.starts_with(HIDDEN_FILE_PREFIX))
}

/// Returns true if a directory with this name is a scratch tree.
#[must_use]
pub fn is_scratch_dir(name: &str) -> bool {
    SCRATCH_DIR_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

fn remove_unwanted_entries(root: &Path, custom: &HashSet<PathBuf>, report: &mut CleanupReport) {
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(error = %error, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy();

        if entry.file_type().is_dir() {
            if is_scratch_dir(&name) {
                debug!(path = %entry.path().display(), "removing scratch directory");
                report.record_dir(&remove_path(entry.path()), "remove scratch directory");
            }
        } else if is_unwanted_file(&name, entry.path(), custom) {
            debug!(path = %entry.path().display(), "removing unwanted file");
            report.record_file(&remove_single_file(entry.path()));
        }
    }
}

fn remove_empty_dirs(root: &Path, report: &mut CleanupReport) {
    for entry in WalkDir::new(root).contents_first(true) {
        let Ok(entry) = entry else {
            continue;
        };
        if !entry.file_type().is_dir() {
            continue;
        }
        let is_empty = fs::read_dir(entry.path())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            report.record_dir(&remove_empty_dir(entry.path()), "remove empty directory");
        }
    }
}
