//! Full reset of the download root and of the download clients' job lists.
//!
//! Meant for startup and shutdown, not steady-state use.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info, instrument};

use crate::clean::clean_download;

/// A download client refused or failed to drop its jobs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{client}: {message}")]
pub struct ClientError {
    /// Client name.
    pub client: String,
    /// What went wrong.
    pub message: String,
}

impl ClientError {
    /// Creates an error for `client`.
    pub fn new(client: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            client: client.into(),
            message: message.into(),
        }
    }
}

/// An external download client that can drop every active and queued job.
#[async_trait]
pub trait DownloadClient: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Removes every job the client knows about.
    async fn remove_all(&self) -> Result<(), ClientError>;
}

/// Resets the download root and both download clients.
pub struct GlobalCleanup {
    root: PathBuf,
    transfer_client: Arc<dyn DownloadClient>,
    peer_client: Arc<dyn DownloadClient>,
}

impl GlobalCleanup {
    /// Creates a cleanup bound to `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        transfer_client: Arc<dyn DownloadClient>,
        peer_client: Arc<dyn DownloadClient>,
    ) -> Self {
        Self {
            root: root.into(),
            transfer_client,
            peer_client,
        }
    }

    /// The download root this cleanup wipes.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Tells both clients to drop all jobs, wipes the root, then recreates it empty.
    ///
    /// Client and deletion failures are logged and do not stop the reset.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root cannot be recreated.
    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub async fn clean_all(&self) -> io::Result<()> {
        for client in [&self.transfer_client, &self.peer_client] {
            match client.remove_all().await {
                Ok(()) => info!(client = client.name(), "removed all client jobs"),
                Err(err) => error!(client = %err.client, error = %err.message, "client cleanup failed"),
            }
        }

        clean_download(&self.root).await;
        tokio::fs::create_dir_all(&self.root).await?;
        info!(root = %self.root.display(), "download root reset");
        Ok(())
    }
}
