use crate::config::{CachePolicy, SessionSettings};
use crate::download_client::DownloadClient;
use crate::error::DlUnzipError;
use crate::logging::progress_bar_style;
use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const USER_AGENT: &str = concat!("dlunzip/", env!("CARGO_PKG_VERSION"));

/// Downloads over HTTP(S). A fresh [`Client`] is built for every download and
/// dropped as soon as the transfer ends.
#[derive(Debug, Default, Clone)]
pub struct HttpDownloadClient;

impl HttpDownloadClient {
    pub fn new() -> Self {
        Self
    }

    fn build_session(session: &SessionSettings) -> Result<Client> {
        let mut headers = HeaderMap::new();
        if session.cache_policy == CachePolicy::ReloadIgnoringLocalCache {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .connect_timeout(session.request_timeout)
            .read_timeout(session.request_timeout)
            .timeout(session.resource_timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(client)
    }
}

impl DownloadClient for HttpDownloadClient {
    #[instrument(skip_all)]
    async fn download(&self, session: &SessionSettings, url: &str, path: &Path) -> Result<()> {
        let client = Self::build_session(session)?;

        let current_span = tracing::Span::current();
        current_span.pb_set_style(&progress_bar_style()?);
        current_span.pb_set_message(&format!("Downloading {url}..."));
        current_span.pb_set_finish_message(&format!("Downloading {url}... Complete!"));

        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DlUnzipError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            }
            .into());
        }

        let expected = response.content_length();
        if let Some(len) = expected {
            current_span.pb_set_length(len);
        }

        let mut file = tokio::fs::File::create(path)
            .await
            .context(format!("Failed to create {}", path.display()))?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        use futures_util::StreamExt;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            current_span.pb_set_position(downloaded);
            match expected {
                Some(total) => tracing::debug!("{downloaded} / {total}"),
                None => tracing::debug!("{downloaded} / unknown"),
            }

            if session.discretionary {
                tokio::task::yield_now().await;
            }
        }

        file.flush().await?;
        drop(client);
        tracing::debug!("Download session finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accepts one connection, answers it with `response` and hands back the
    /// lowercased request head.
    async fn serve_once(response: Vec<u8>) -> Result<(String, JoinHandle<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept failed");
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.expect("read failed");
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(&response).await.expect("write failed");
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_lowercase()
        });
        Ok((format!("http://{addr}/image.zip"), handle))
    }

    fn ok_response(body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/zip\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    #[test]
    fn test_build_session_from_default_settings() {
        let session = Settings::default().session();
        assert!(HttpDownloadClient::build_session(&session).is_ok());
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("dlunzip/"));
        assert!(USER_AGENT.len() > "dlunzip/".len());
    }

    #[tokio::test]
    async fn test_download_writes_body_and_skips_cache() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let output = tmp_dir.path().join("download.zip");
        let (url, server) = serve_once(ok_response(b"PK archive bytes")).await?;

        HttpDownloadClient::new()
            .download(&Settings::default().session(), &url, &output)
            .await?;

        assert_eq!(std::fs::read(&output)?, b"PK archive bytes");
        let request = server.await?;
        assert!(request.starts_with("get /image.zip http/1.1"));
        assert!(request.contains("cache-control: no-cache"));
        assert!(request.contains("pragma: no-cache"));
        assert!(request.contains("user-agent: dlunzip/"));
        Ok(())
    }

    #[tokio::test]
    async fn test_reuse_cache_sends_no_cache_headers() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let output = tmp_dir.path().join("download.zip");
        let (url, server) = serve_once(ok_response(b"zip")).await?;
        let session = Settings {
            reuse_cache: true,
            ..Settings::default()
        }
        .session();

        HttpDownloadClient::new()
            .download(&session, &url, &output)
            .await?;

        let request = server.await?;
        assert!(!request.contains("cache-control"));
        assert!(!request.contains("pragma"));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_is_reported_without_writing() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let output = tmp_dir.path().join("download.zip");
        let (url, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_vec(),
        )
        .await?;

        let err = HttpDownloadClient::new()
            .download(&Settings::default().session(), &url, &output)
            .await
            .unwrap_err();

        match err.downcast_ref::<DlUnzipError>() {
            Some(DlUnzipError::HttpStatus { status, .. }) => {
                assert_eq!(*status, reqwest::StatusCode::NOT_FOUND)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_short_body_fails_the_download() -> Result<()> {
        let tmp_dir = TempDir::new()?;
        let output = tmp_dir.path().join("download.zip");
        let (url, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nabc".to_vec(),
        )
        .await?;

        let result = HttpDownloadClient::new()
            .download(&Settings::default().session(), &url, &output)
            .await;

        assert!(result.is_err());
        server.await?;
        Ok(())
    }
}
