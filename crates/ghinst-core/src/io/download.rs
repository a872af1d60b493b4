//! Asset download into scoped temporary storage.
//!
//! The response body is streamed into a [`NamedTempFile`] so large assets are
//! never held in memory. The file is deleted when the returned handle drops.

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::Reporter;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("download returned HTTP {0}")]
    Upstream(StatusCode),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request for a download operation
pub struct DownloadRequest<'a, R: Reporter> {
    pub client: &'a Client,
    pub url: &'a str,
    /// Display name for progress reporting.
    pub name: &'a str,
    /// Optional bearer credential.
    pub token: Option<&'a str>,
    /// Size advertised by the registry, used when the server sends no length.
    pub expected_size: Option<u64>,
    pub reporter: &'a R,
}

impl<'a, R: Reporter> DownloadRequest<'a, R> {
    pub fn new(client: &'a Client, url: &'a str, name: &'a str, reporter: &'a R) -> Self {
        Self {
            client,
            url,
            name,
            token: None,
            expected_size: None,
            reporter,
        }
    }

    pub fn with_token(mut self, token: Option<&'a str>) -> Self {
        self.token = token;
        self
    }

    pub fn with_expected_size(mut self, size: u64) -> Self {
        self.expected_size = (size > 0).then_some(size);
        self
    }

    /// Execute the download, returning the temp file holding the full body.
    pub async fn execute(self) -> Result<NamedTempFile, DownloadError> {
        let mut request = self
            .client
            .get(self.url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT);
        if let Some(token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Upstream(status));
        }

        let total = response.content_length().or(self.expected_size);
        self.reporter.downloading(self.name, 0, total);

        let temp = NamedTempFile::new()?;
        let mut file = tokio::fs::File::from_std(temp.as_file().try_clone()?);
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            self.reporter.downloading(self.name, downloaded, total);
        }
        file.flush().await?;

        debug!(url = self.url, bytes = downloaded, path = %temp.path().display(), "download complete");
        Ok(temp)
    }
}
