use futures_util::TryStreamExt;
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use tracing::info;
use url::Url;

use crate::infrastructure::storage::workspace::JobWorkspace;

#[derive(Debug, Error)]
#[error("Failed to download video {index} ({url}): {message}")]
pub struct FetchError {
    pub index: usize,
    pub url: String,
    pub message: String,
}

/// Downloads remote inputs into a job workspace, one at a time, in order.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    /// Returns one local path per URL, index-aligned with `urls`.
    /// Stops at the first failure; nothing after it is requested.
    pub async fn fetch_all(
        &self,
        workspace: &JobWorkspace,
        urls: &[String],
    ) -> Result<Vec<PathBuf>, FetchError> {
        let job_id = workspace.job_id();
        let mut paths = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            let dest = workspace.input_path(index);
            info!(job_id = %job_id, index, url = %url, "⬇️ Downloading video {}/{}", index + 1, urls.len());

            let bytes = self
                .fetch_to_file(url, &dest)
                .await
                .map_err(|message| FetchError {
                    index,
                    url: url.clone(),
                    message,
                })?;

            info!(job_id = %job_id, index, bytes, "⬇️ Downloaded video {}/{}", index + 1, urls.len());
            paths.push(dest);
        }

        Ok(paths)
    }

    async fn fetch_to_file(&self, url: &str, dest: &Path) -> Result<u64, String> {
        let parsed = Url::parse(url).map_err(|e| format!("invalid URL: {}", e))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(format!("unsupported URL scheme '{}'", parsed.scheme()));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.describe(&e))?;

        let mut reader = StreamReader::new(response.bytes_stream().map_err(io::Error::other));

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| format!("failed to create {}: {}", dest.display(), e))?;

        let written = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| match e.get_ref().and_then(|inner| inner.downcast_ref::<reqwest::Error>()) {
                Some(inner) => self.describe(inner),
                None => format!("failed to write {}: {}", dest.display(), e),
            })?;

        file.flush()
            .await
            .map_err(|e| format!("failed to flush {}: {}", dest.display(), e))?;

        Ok(written)
    }

    fn describe(&self, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs_f32())
        } else if let Some(status) = e.status() {
            format!("server responded with {}", status)
        } else {
            e.to_string()
        }
    }
}
