//! CLI command handlers.

mod classify;
mod clean;
mod config;
mod join;
mod size;
mod storage;
mod wipe;

pub use classify::run_classify_command;
pub use clean::{run_clean_command, run_clean_download_command, run_clean_target_command};
pub use config::run_config_show_command;
pub use join::run_join_command;
pub use size::{run_count_command, run_size_command};
pub use storage::run_check_storage_command;
pub use wipe::run_wipe_command;

use anyhow::{Context, Result};
use serde::Serialize;

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}
