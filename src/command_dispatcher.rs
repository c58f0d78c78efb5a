//! CLI command routing.

use anyhow::Result;

use crate::app_config::{LoadedConfig, Settings};
use crate::cli::{Command, ConfigCommand};
use crate::{ProcessExit, commands};

/// Runs the handler for `command` and returns the exit outcome.
pub(crate) async fn dispatch(
    command: &Command,
    settings: &Settings,
    loaded: &LoadedConfig,
) -> Result<ProcessExit> {
    match command {
        Command::Classify { names, json } => commands::run_classify_command(names, *json),
        Command::Size { path, json } => commands::run_size_command(path, *json).await,
        Command::Count(args) => commands::run_count_command(args).await,
        Command::Clean { path, remove, json } => {
            commands::run_clean_command(path, remove, *json).await
        }
        Command::CleanTarget { path } => Ok(commands::run_clean_target_command(path).await),
        Command::CleanDownload { path } => Ok(commands::run_clean_download_command(path).await),
        Command::Join { dir, json } => commands::run_join_command(dir, *json).await,
        Command::CheckStorage(args) => commands::run_check_storage_command(args, settings).await,
        Command::Wipe { yes } => commands::run_wipe_command(settings, *yes).await,
        Command::Config { command } => match command {
            ConfigCommand::Show => {
                commands::run_config_show_command(settings, loaded);
                Ok(ProcessExit::Success)
            }
        },
    }
}
