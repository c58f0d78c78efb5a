//! `check-storage`: free-space admission for the download root.

use anyhow::{Context, Result};
use storekeep_core::storage::StorageGate;

use crate::ProcessExit;
use crate::app_config::Settings;
use crate::cli::CheckStorageArgs;

pub async fn run_check_storage_command(
    args: &CheckStorageArgs,
    settings: &Settings,
) -> Result<ProcessExit> {
    let gate = StorageGate::new(&settings.download_dir);
    let threshold = args.threshold.unwrap_or(settings.storage_threshold_bytes);
    let allowed = gate
        .check_storage_threshold(args.size, threshold, args.archive, args.prealloc)
        .await
        .with_context(|| {
            format!(
                "Failed to read free space of '{}'",
                settings.download_dir.display()
            )
        })?;

    if allowed {
        println!("allowed");
        Ok(ProcessExit::Success)
    } else {
        println!("storage exhausted");
        Ok(ProcessExit::Failure)
    }
}
