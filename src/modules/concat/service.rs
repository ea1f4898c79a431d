use bytes::Bytes;
use serde_json::Value;
use std::io;
use std::path::Path;
use tracing::info;
use uuid::Uuid;

use super::dto::ConcatRequest;
use super::error::ConcatError;
use crate::infrastructure::storage::workspace::JobWorkspace;
use crate::state::AppState;

pub const MISSING_URLS_MESSAGE: &str = "video_urls array is required";

pub struct ConcatService;

impl ConcatService {
    /// Accepts only a non-empty array of strings. URL syntax is left to the fetcher.
    pub fn validate(req: ConcatRequest) -> Result<Vec<String>, ConcatError> {
        let items = match req.video_urls {
            Some(Value::Array(items)) if !items.is_empty() => items,
            _ => return Err(ConcatError::invalid_input(MISSING_URLS_MESSAGE)),
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::String(url) => Ok(url),
                _ => Err(ConcatError::invalid_input("video_urls must contain only strings")),
            })
            .collect()
    }

    /// Runs one job end to end and returns the output bytes.
    ///
    /// The workspace is removed exactly once whether or not the pipeline succeeds.
    pub async fn concatenate(state: AppState, job_id: Uuid, urls: Vec<String>) -> Result<Bytes, ConcatError> {
        let workspace = JobWorkspace::create(&state.config.temp_root, job_id)
            .await
            .map_err(|e| ConcatError::InternalFailure(format!("Failed to create workspace: {}", e)))?;

        let result = Self::run_pipeline(&state, &workspace, &urls).await;

        workspace.remove().await;
        result
    }

    async fn run_pipeline(state: &AppState, workspace: &JobWorkspace, urls: &[String]) -> Result<Bytes, ConcatError> {
        let job_id = workspace.job_id();

        let inputs = state.fetcher.fetch_all(workspace, urls).await?;
        info!(job_id = %job_id, count = inputs.len(), "All videos downloaded");

        let output = state.processor.concatenate(workspace, &inputs).await?;
        info!(job_id = %job_id, "🎬 Processing finished");

        read_output(&output).await
    }
}

/// Reads the produced file, refusing to trust a success report for a file that is
/// missing or empty.
async fn read_output(path: &Path) -> Result<Bytes, ConcatError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        Ok(_) => return Err(ConcatError::processing_failed("output file is empty")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ConcatError::processing_failed("output not created"));
        }
        Err(e) => return Err(e.into()),
    }

    let data = tokio::fs::read(path).await?;
    Ok(Bytes::from(data))
}
