//! Size and entry-count aggregation over directory trees.
//!
//! Walks never follow symbolic links; a link contributes no bytes. In entry counts a
//! link to a directory is a folder and any other link is a file. Entries that disappear while a walk is in progress are skipped, so
//! the results are a best-effort snapshot of a tree that may be changing underneath.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::blocking::run_blocking;

/// Returns the byte size of a file, or the summed size of every regular file below a directory.
///
/// A missing path yields 0.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn get_path_size(path: impl AsRef<Path>) -> u64 {
    let path = path.as_ref().to_path_buf();
    run_blocking(move || path_size(&path)).await
}

/// Counts `(folders, files)` below `path`.
///
/// Every directory below the root counts once. A non-directory entry is left out of
/// the file count when its name ends with one of `extension_filter` or its full path
/// is listed in `excluded_paths`. A missing root yields `(0, 0)`.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub async fn count_files_and_folders(
    path: impl AsRef<Path>,
    extension_filter: &[String],
    excluded_paths: &[PathBuf],
) -> (u64, u64) {
    let path = path.as_ref().to_path_buf();
    let extension_filter = extension_filter.to_vec();
    let excluded: HashSet<PathBuf> = excluded_paths.iter().cloned().collect();
    run_blocking(move || count_entries(&path, &extension_filter, &excluded)).await
}

fn path_size(path: &Path) -> u64 {
    match path.metadata() {
        Ok(metadata) if metadata.is_file() => return metadata.len(),
        Ok(_) => {}
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %error, "cannot stat path, treating as empty");
            }
            return 0;
        }
    }

    let mut total = 0_u64;
    for entry in WalkDir::new(path) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(error = %error, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(metadata) => total = total.saturating_add(metadata.len()),
            Err(error) => {
                debug!(path = %entry.path().display(), error = %error, "entry vanished during size walk");
            }
        }
    }
    total
}

fn count_entries(
    root: &Path,
    extension_filter: &[String],
    excluded: &HashSet<PathBuf>,
) -> (u64, u64) {
    let mut folders = 0_u64;
    let mut files = 0_u64;

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(error = %error, "skipping unreadable entry");
                continue;
            }
        };

        // Links to directories count as folders but are not descended into.
        if entry.file_type().is_dir() || (entry.path_is_symlink() && entry.path().is_dir()) {
            folders += 1;
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let filtered = extension_filter
            .iter()
            .any(|extension| name.ends_with(extension.as_str()));
        if filtered || excluded.contains(entry.path()) {
            continue;
        }
        files += 1;
    }

    (folders, files)
}
