//! `clean`, `clean-target` and `clean-download`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use storekeep_core::clean::{RemovalOutcome, clean_download, clean_target, clean_unwanted};

use super::print_json;
use crate::ProcessExit;

pub async fn run_clean_command(
    path: &Path,
    remove: &[PathBuf],
    json: bool,
) -> Result<ProcessExit> {
    let report = clean_unwanted(path, remove).await;
    if json {
        print_json(&report)?;
    } else {
        println!(
            "removed {} file(s) and {} folder(s), {} failure(s)",
            report.files_removed, report.dirs_removed, report.failures
        );
    }
    Ok(ProcessExit::Success)
}

pub async fn run_clean_target_command(path: &Path) -> ProcessExit {
    report_outcome(path, &clean_target(path).await)
}

pub async fn run_clean_download_command(path: &Path) -> ProcessExit {
    report_outcome(path, &clean_download(path).await)
}

// Failures were already logged by the library.
fn report_outcome(path: &Path, outcome: &RemovalOutcome) -> ProcessExit {
    match outcome {
        RemovalOutcome::Deleted => {
            println!("removed {}", path.display());
            ProcessExit::Success
        }
        RemovalOutcome::AlreadyGone => {
            println!("nothing to remove at {}", path.display());
            ProcessExit::Success
        }
        RemovalOutcome::Failed(_) => ProcessExit::Failure,
    }
}
