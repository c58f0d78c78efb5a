//! CLI entry point for storekeep.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod command_dispatcher;
mod commands;
mod terminal;

use app_config::{Settings, load_config};
use cli::Cli;

/// Process outcome, mapped to the documented exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Partial,
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial => 1,
            Self::Failure => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(ProcessExit::Failure.code())
        }
    }
}

async fn run() -> Result<ProcessExit> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    let loaded = load_config(cli.config.as_deref())?;
    let settings = Settings::resolve(cli.download_dir.as_deref(), loaded.config.as_ref());

    let default_level =
        terminal::resolve_default_log_level(cli.verbose, cli.quiet, settings.verbosity);
    let no_color = terminal::no_color_env_requested() || terminal::is_dumb_terminal();
    terminal::init_tracing(default_level, no_color);

    debug!(?cli, "CLI arguments parsed");
    command_dispatcher::dispatch(&cli.command, &settings, &loaded).await
}
