//! `size` and `count`: tree measurements.

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use storekeep_core::size::{count_files_and_folders, get_path_size};

use super::print_json;
use crate::ProcessExit;
use crate::cli::CountArgs;

#[derive(Debug, Serialize)]
struct SizeOutput<'a> {
    path: &'a Path,
    bytes: u64,
}

#[derive(Debug, Serialize)]
struct CountOutput<'a> {
    path: &'a Path,
    folders: u64,
    files: u64,
}

pub async fn run_size_command(path: &Path, json: bool) -> Result<ProcessExit> {
    let bytes = get_path_size(path).await;
    if json {
        print_json(&SizeOutput { path, bytes })?;
    } else {
        println!("{bytes}\t{}", path.display());
    }
    Ok(ProcessExit::Success)
}

pub async fn run_count_command(args: &CountArgs) -> Result<ProcessExit> {
    let (folders, files) =
        count_files_and_folders(&args.path, &args.exclude_ext, &args.exclude).await;
    if args.json {
        print_json(&CountOutput {
            path: &args.path,
            folders,
            files,
        })?;
    } else {
        println!("folders = {folders}");
        println!("files = {files}");
    }
    Ok(ProcessExit::Success)
}
