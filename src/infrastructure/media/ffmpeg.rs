use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use super::probe::{ensure_compatible, probe_streams};
use super::{ConcatStrategy, MediaProcessor, ProcessError};
use crate::config::settings::AppConfig;
use crate::infrastructure::storage::workspace::JobWorkspace;

const MANIFEST_FILE: &str = "concat_list.txt";

/// Subprocess adapter around the ffmpeg CLI.
#[derive(Debug, Clone)]
pub struct FfmpegProcessor {
    ffmpeg_path: String,
    ffprobe_path: String,
    strategy: ConcatStrategy,
    max_diagnostic_bytes: usize,
}

impl FfmpegProcessor {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
            strategy: config.concat_strategy,
            max_diagnostic_bytes: config.max_diagnostic_bytes,
        }
    }

    async fn concat_filter_graph(&self, inputs: &[PathBuf], output: &Path) -> Result<(), ProcessError> {
        self.run(filter_graph_args(inputs, output)).await
    }

    async fn concat_manifest(
        &self,
        workspace: &JobWorkspace,
        inputs: &[PathBuf],
        output: &Path,
    ) -> Result<(), ProcessError> {
        let mut probed = Vec::with_capacity(inputs.len());
        for input in inputs {
            let streams = probe_streams(&self.ffprobe_path, input).await?;
            probed.push((input.clone(), streams));
        }
        ensure_compatible(&probed)?;

        let manifest = workspace.path().join(MANIFEST_FILE);
        tokio::fs::write(&manifest, manifest_contents(inputs)).await?;
        debug!(job_id = %workspace.job_id(), path = %manifest.display(), "Manifest written");

        self.run(manifest_args(&manifest, output)).await
    }

    async fn run(&self, args: Vec<String>) -> Result<(), ProcessError> {
        debug!("Running FFmpeg: {} {}", self.ffmpeg_path, args.join(" "));

        let mut child = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: self.ffmpeg_path.clone(),
                source,
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("stderr not captured"))?;

        let Some(captured) = read_bounded(stderr, self.max_diagnostic_bytes).await? else {
            let _ = child.kill().await;
            return Err(ProcessError::DiagnosticsOverflow {
                limit: self.max_diagnostic_bytes,
            });
        };

        let status = child.wait().await?;
        let diagnostics = String::from_utf8_lossy(&captured).into_owned();

        if !status.success() {
            return Err(ProcessError::Failed {
                program: self.ffmpeg_path.clone(),
                status: status.to_string(),
                diagnostics,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MediaProcessor for FfmpegProcessor {
    async fn concatenate(
        &self,
        workspace: &JobWorkspace,
        inputs: &[PathBuf],
    ) -> Result<PathBuf, ProcessError> {
        let output = workspace.output_path();
        info!(
            job_id = %workspace.job_id(),
            inputs = inputs.len(),
            strategy = ?self.strategy,
            "🎬 Concatenating videos"
        );

        match self.strategy {
            ConcatStrategy::FilterGraph => self.concat_filter_graph(inputs, &output).await?,
            ConcatStrategy::Manifest => self.concat_manifest(workspace, inputs, &output).await?,
        }

        Ok(output)
    }
}

/// Reads at most `limit` bytes. `None` means the stream had more.
pub async fn read_bounded<R: AsyncRead + Unpin>(
    reader: R,
    limit: usize,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    reader.take(limit as u64 + 1).read_to_end(&mut buf).await?;

    if buf.len() > limit {
        Ok(None)
    } else {
        Ok(Some(buf))
    }
}

/// `[0:v][0:a][1:v][1:a]...concat=n=N:v=1:a=1[outv][outa]`
pub fn filter_graph(count: usize) -> String {
    let pads: String = (0..count).map(|i| format!("[{i}:v][{i}:a]")).collect();
    format!("{pads}concat=n={count}:v=1:a=1[outv][outa]")
}

pub fn filter_graph_args(inputs: &[PathBuf], output: &Path) -> Vec<String> {
    let mut args = vec!["-y".to_string(), "-v".to_string(), "error".to_string()];

    for input in inputs {
        args.push("-i".to_string());
        args.push(input.to_string_lossy().into_owned());
    }

    args.push("-filter_complex".to_string());
    args.push(filter_graph(inputs.len()));
    args.extend(["-map", "[outv]", "-map", "[outa]"].map(String::from));
    args.extend(encode_args());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// One `file '<path>'` line per input, in input order.
pub fn manifest_contents(inputs: &[PathBuf]) -> String {
    inputs
        .iter()
        .map(|p| format!("file '{}'\n", p.to_string_lossy().replace('\'', r"'\''")))
        .collect()
}

pub fn manifest_args(manifest: &Path, output: &Path) -> Vec<String> {
    let mut args = ["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i"]
        .map(String::from)
        .to_vec();
    args.push(manifest.to_string_lossy().into_owned());
    args.extend(encode_args());
    args.push(output.to_string_lossy().into_owned());
    args
}

fn encode_args() -> Vec<String> {
    ["-c:v", "libx264", "-preset", "fast", "-c:a", "aac", "-movflags", "+faststart"]
        .map(String::from)
        .to_vec()
}
