//! Storekeep Core Library
//!
//! On-disk lifecycle of downloaded content: classifying archive names,
//! measuring and cleaning download trees, reassembling split files,
//! free-space admission checks and the global reset of the download root.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`classify`] - Archive and split-volume classification by name
//! - [`size`] - Size and entry-count aggregation over trees
//! - [`clean`] - Best-effort recursive cleanup
//! - [`join`] - Reassembly of `name.001`, `name.002`, ... fragments
//! - [`storage`] - Free-space admission gate
//! - [`wipe`] - Full reset of the download root and download clients
//! - [`constants`] - Fixed name tables shared by the modules above
//!
//! Operations that walk the filesystem are `async` and run the walk on tokio's
//! blocking pool. None of them lock anything: entries that vanish mid-walk are
//! skipped, so callers that need exclusivity on a path must serialize themselves.

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod blocking;

pub mod classify;
pub mod clean;
pub mod constants;
pub mod join;
pub mod size;
pub mod storage;
pub mod wipe;

// Re-export commonly used types
pub use classify::{
    ClassifyError, NameClass, classify_name, get_base_name, is_archive, is_archive_split,
    is_first_archive_split,
};
pub use clean::{
    CleanupReport, DeletionFailure, RemovalOutcome, clean_download, clean_target, clean_unwanted,
};
pub use join::{
    CommandExecutor, ConcatenationFailure, ContentProbe, JoinReport, JoinStatus, Joiner,
};
pub use size::{count_files_and_folders, get_path_size};
pub use storage::{StorageGate, storage_allows};
pub use wipe::{ClientError, DownloadClient, GlobalCleanup};
