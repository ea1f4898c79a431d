use crate::config::env::{self, EnvKey};
use crate::infrastructure::media::ConcatStrategy;
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound on captured processor stderr.
pub const MAX_DIAGNOSTIC_BYTES: usize = 50 * 1024 * 1024;

/// Upper bound on the JSON request body.
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub temp_root: PathBuf,
    pub download_timeout: Duration,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub concat_strategy: ConcatStrategy,
    pub max_diagnostic_bytes: usize,
}

impl AppConfig {
    pub fn new() -> Self {
        let temp_root = env::get(EnvKey::TempRoot)
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("video-concat"));

        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            temp_root,
            download_timeout: Duration::from_secs(env::get_parsed(EnvKey::DownloadTimeoutSecs, 60)),
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            concat_strategy: env::get_parsed(EnvKey::ConcatStrategy, ConcatStrategy::default()),
            max_diagnostic_bytes: MAX_DIAGNOSTIC_BYTES,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
