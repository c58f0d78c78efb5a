//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0 = success
  1 = partial success (some split sets failed to join)
  2 = failure, storage exhausted, or fatal error";

/// Lifecycle tooling for downloaded content on disk.
///
/// Storekeep classifies archive names, measures and cleans download trees,
/// joins split files, answers free-space admission checks and resets the
/// download root.
#[derive(Parser, Debug)]
#[command(name = "storekeep")]
#[command(author, version, about, after_help = EXIT_CODES_HELP)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Download root (overrides `download_dir` from the config file)
    #[arg(long, value_name = "DIR", global = true)]
    pub download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify file names as archives and split volumes
    Classify {
        /// File names to classify
        #[arg(required = true)]
        names: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the byte size of a file or directory tree
    Size {
        path: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Count folders and files below a directory
    Count(CountArgs),

    /// Remove junk files, scratch directories and empty folders
    Clean {
        path: PathBuf,

        /// Extra file to remove (repeatable)
        #[arg(long = "remove", value_name = "PATH")]
        remove: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Delete a file or directory tree
    CleanTarget { path: PathBuf },

    /// Wipe an aborted download root, continuing past errors
    CleanDownload { path: PathBuf },

    /// Join split files (name.001, name.002, ...) in a directory
    Join {
        dir: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check whether the download root has room for an operation
    CheckStorage(CheckStorageArgs),

    /// Drop all client jobs, then wipe and recreate the download root
    Wipe {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    pub path: PathBuf,

    /// Leave files with this name suffix out of the count (repeatable)
    #[arg(long = "exclude-ext", value_name = "SUFFIX")]
    pub exclude_ext: Vec<String>,

    /// Leave this exact path out of the count (repeatable)
    #[arg(long = "exclude", value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CheckStorageArgs {
    /// Size of the pending operation in bytes
    #[arg(long)]
    pub size: u64,

    /// Free-space reserve in bytes (defaults to `storage_threshold_mib` from config)
    #[arg(long)]
    pub threshold: Option<u64>,

    /// The operation extracts an archive and needs room for both copies
    #[arg(long)]
    pub archive: bool,

    /// Nothing has been written yet; check the reserve only
    #[arg(long)]
    pub prealloc: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}
