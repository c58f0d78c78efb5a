//! Non-fatal removal results.
//!
//! Cleanup never propagates deletion errors. Each removal reports a
//! [`RemovalOutcome`]; callers log failures and move on.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// A file or directory could not be removed.
#[derive(Debug, Error)]
#[error("failed to remove {path}: {source}")]
pub struct DeletionFailure {
    /// The path that could not be removed.
    pub path: PathBuf,
    /// The underlying IO error.
    #[source]
    pub source: io::Error,
}

/// Result of a single best-effort removal.
#[derive(Debug)]
pub enum RemovalOutcome {
    /// The path existed and was removed.
    Deleted,
    /// The path was already absent; nothing to do.
    AlreadyGone,
    /// Removal failed; the path may still exist.
    Failed(DeletionFailure),
}

impl RemovalOutcome {
    fn from_io(path: &Path, result: io::Result<()>) -> Self {
        match result {
            Ok(()) => Self::Deleted,
            Err(source) if source.kind() == io::ErrorKind::NotFound => Self::AlreadyGone,
            Err(source) => Self::Failed(DeletionFailure {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Returns true when the path is absent after the call.
    #[must_use]
    pub fn is_gone(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }

    /// Returns true when this call actually removed something.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::Deleted)
    }

    /// Emits one error line if the removal failed.
    pub fn log_failure(&self, action: &str) {
        if let Self::Failed(failure) = self {
            error!(
                path = %failure.path.display(),
                error = %failure.source,
                action,
                "removal failed"
            );
        }
    }
}

/// Removes a single non-directory entry.
pub(crate) fn remove_single_file(path: &Path) -> RemovalOutcome {
    RemovalOutcome::from_io(path, fs::remove_file(path))
}

/// Removes a directory that is expected to be empty.
pub(crate) fn remove_empty_dir(path: &Path) -> RemovalOutcome {
    RemovalOutcome::from_io(path, fs::remove_dir(path))
}

/// Removes `path` whether it is a file or a directory tree; stops at the first error.
pub(crate) fn remove_path(path: &Path) -> RemovalOutcome {
    let result = match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(source) => Err(source),
    };
    RemovalOutcome::from_io(path, result)
}

/// Removes everything under `path` bottom-up, continuing past entries that fail.
///
/// Each failed entry is logged once. Returns the outcome for `path` itself.
pub(crate) fn remove_tree_best_effort(path: &Path) -> RemovalOutcome {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => {}
        Ok(_) => return remove_single_file(path),
        Err(source) => return RemovalOutcome::from_io(path, Err(source)),
    }

    for entry in WalkDir::new(path).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(error = %error, "skipping unreadable entry during wipe");
                continue;
            }
        };
        let outcome = if entry.file_type().is_dir() {
            remove_empty_dir(entry.path())
        } else {
            remove_single_file(entry.path())
        };
        if let RemovalOutcome::Failed(failure) = &outcome
            && entry.depth() > 0
        {
            warn!(
                path = %failure.path.display(),
                error = %failure.source,
                "could not remove entry, continuing"
            );
        }
    }

    if path.exists() {
        RemovalOutcome::Failed(DeletionFailure {
            path: path.to_path_buf(),
            source: io::Error::other("entries remain after best-effort removal"),
        })
    } else {
        RemovalOutcome::Deleted
    }
}
