//! `wipe`: reset both download clients and the download root.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use storekeep_core::join::{CommandExecutor, ShellExecutor};
use storekeep_core::wipe::{ClientError, DownloadClient, GlobalCleanup};
use tracing::info;

use crate::ProcessExit;
use crate::app_config::Settings;

/// A download client reached through a configured shell command.
struct CommandClient {
    name: &'static str,
    command: Option<String>,
    executor: ShellExecutor,
}

impl CommandClient {
    fn new(name: &'static str, command: Option<String>) -> Self {
        Self {
            name,
            command,
            executor: ShellExecutor::new(),
        }
    }
}

#[async_trait]
impl DownloadClient for CommandClient {
    fn name(&self) -> &str {
        self.name
    }

    async fn remove_all(&self) -> Result<(), ClientError> {
        let Some(command) = &self.command else {
            info!(client = self.name, "no remove command configured, skipping");
            return Ok(());
        };
        let output = self
            .executor
            .exec(command)
            .await
            .map_err(|error| ClientError::new(self.name, error.to_string()))?;
        if output.success() {
            Ok(())
        } else {
            Err(ClientError::new(
                self.name,
                format!("exit code {}: {}", output.code, output.stderr.trim()),
            ))
        }
    }
}

pub async fn run_wipe_command(settings: &Settings, yes: bool) -> Result<ProcessExit> {
    if !yes {
        bail!(
            "Refusing to wipe '{}' without --yes",
            settings.download_dir.display()
        );
    }

    let cleanup = GlobalCleanup::new(
        &settings.download_dir,
        Arc::new(CommandClient::new(
            "transfer",
            settings.transfer_client_remove_command.clone(),
        )),
        Arc::new(CommandClient::new(
            "peer",
            settings.peer_client_remove_command.clone(),
        )),
    );
    cleanup.clean_all().await.with_context(|| {
        format!(
            "Failed to recreate download root '{}'",
            settings.download_dir.display()
        )
    })?;
    println!("wiped {}", settings.download_dir.display());
    Ok(ProcessExit::Success)
}
