use crate::config::SessionSettings;
use crate::download_client::DownloadClient;
use anyhow::{Context, bail};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

enum Response {
    Archive(Vec<u8>),
    NetworkError,
    /// Writes the bytes, then fails as if the connection dropped.
    Truncated(Vec<u8>),
}

/// Serves a canned archive (or a canned failure) and counts requests.
pub struct MockDownloadClient {
    response: Response,
    requests: Arc<AtomicUsize>,
    gate: Option<Arc<Notify>>,
}

impl MockDownloadClient {
    pub fn serving(archive: Vec<u8>) -> Self {
        Self {
            response: Response::Archive(archive),
            requests: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    pub fn failing() -> Self {
        Self {
            response: Response::NetworkError,
            requests: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    pub fn truncated(partial: Vec<u8>) -> Self {
        Self {
            response: Response::Truncated(partial),
            requests: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Holds every download open until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        self.requests.clone()
    }
}

impl DownloadClient for MockDownloadClient {
    async fn download(
        &self,
        _session: &SessionSettings,
        url: &str,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        match &self.response {
            Response::Archive(bytes) => {
                fs::write(output_path, bytes)
                    .context(format!("Failed to write zip file: {:?}", output_path))?;
                Ok(())
            }
            Response::NetworkError => bail!("connection to {url} timed out"),
            Response::Truncated(bytes) => {
                fs::write(output_path, bytes)
                    .context(format!("Failed to write zip file: {:?}", output_path))?;
                bail!("connection to {url} closed before message completed")
            }
        }
    }
}
