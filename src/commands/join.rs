//! `join`: reassemble split files in one directory.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use storekeep_core::join::{JoinReport, JoinStatus, Joiner};

use super::print_json;
use crate::ProcessExit;

#[derive(Debug, Serialize)]
struct JoinOutput<'a> {
    status: JoinStatus,
    #[serde(flatten)]
    report: &'a JoinReport,
}

pub async fn run_join_command(dir: &Path, json: bool) -> Result<ProcessExit> {
    let report = Joiner::default()
        .join_files(dir)
        .await
        .with_context(|| format!("Failed to list '{}'", dir.display()))?;
    let status = report.status();

    if json {
        print_json(&JoinOutput {
            status,
            report: &report,
        })?;
    } else {
        for output in &report.joined {
            println!("joined {}", output.display());
        }
        for failure in &report.failed {
            println!("failed {} (exit code {})", failure.base, failure.code);
        }
        for base in &report.skipped {
            println!("skipped {base} (container archive)");
        }
    }

    Ok(exit_for_status(status))
}

fn exit_for_status(status: JoinStatus) -> ProcessExit {
    match status {
        JoinStatus::NothingToJoin | JoinStatus::Completed => ProcessExit::Success,
        JoinStatus::Partial => ProcessExit::Partial,
        JoinStatus::Failed => ProcessExit::Failure,
    }
}
