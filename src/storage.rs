//! Free-space admission checks for the download root.
//!
//! A `false` answer is the normal "storage exhausted" result, not an error.
//! Free space is read from the device on every call.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::blocking::run_blocking;

/// Decides whether an operation of `size` bytes fits in `free` bytes while
/// keeping `threshold` bytes in reserve.
///
/// Archive operations need room for the source and the extracted copy, so they
/// count twice. A preallocation check has written nothing yet: a plain file only
/// needs the reserve, an archive needs its size once.
///
/// ```
/// use storekeep_core::storage::storage_allows;
///
/// assert!(storage_allows(200, 100, 50, false, false));
/// assert!(!storage_allows(140, 100, 50, false, false));
/// ```
#[must_use]
pub fn storage_allows(
    free: u64,
    size: u64,
    threshold: u64,
    is_archive: bool,
    is_preallocation: bool,
) -> bool {
    let size = u128::from(size);
    let need = match (is_preallocation, is_archive) {
        (false, false) => size,
        (false, true) => size * 2,
        (true, false) => 0,
        (true, true) => size,
    };
    u128::from(free) >= need + u128::from(threshold)
}

/// Storage admission gate bound to one download root.
#[derive(Debug, Clone)]
pub struct StorageGate {
    root: PathBuf,
}

impl StorageGate {
    /// Creates a gate that measures the filesystem holding `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The measured root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Bytes available to unprivileged writers on the root's filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or the filesystem cannot be queried.
    pub async fn free_space(&self) -> io::Result<u64> {
        let root = self.root.clone();
        run_blocking(move || fs2::available_space(&root)).await
    }

    /// Returns whether an operation of `size` bytes is admitted.
    ///
    /// # Errors
    ///
    /// Returns an error only if free space cannot be read.
    pub async fn check_storage_threshold(
        &self,
        size: u64,
        threshold: u64,
        is_archive: bool,
        is_preallocation: bool,
    ) -> io::Result<bool> {
        let free = self.free_space().await?;
        let allowed = storage_allows(free, size, threshold, is_archive, is_preallocation);
        if allowed {
            debug!(free, size, threshold, is_archive, is_preallocation, "storage check passed");
        } else {
            warn!(
                root = %self.root.display(),
                free,
                size,
                threshold,
                is_archive,
                is_preallocation,
                "storage exhausted"
            );
        }
        Ok(allowed)
    }
}
