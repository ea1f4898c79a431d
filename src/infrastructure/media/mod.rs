use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::infrastructure::storage::workspace::JobWorkspace;

pub mod ffmpeg;
pub mod probe;

pub use ffmpeg::FfmpegProcessor;

/// Joins an ordered list of local media files into one output file.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    /// `inputs` are concatenated in slice order. The returned path lives in
    /// `workspace`; callers must not assume it exists.
    async fn concatenate(
        &self,
        workspace: &JobWorkspace,
        inputs: &[PathBuf],
    ) -> Result<PathBuf, ProcessError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConcatStrategy {
    /// `concat` filter over every input's video+audio pair. Re-encodes all inputs.
    #[default]
    FilterGraph,
    /// ffmpeg concat demuxer over a list file. Inputs must share stream parameters.
    Manifest,
}

impl FromStr for ConcatStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "filter" | "filter_graph" | "filter-graph" => Ok(Self::FilterGraph),
            "manifest" | "list" | "demuxer" => Ok(Self::Manifest),
            other => Err(format!("unknown concat strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: String,
        diagnostics: String,
    },

    #[error("Diagnostic output exceeded {limit} bytes")]
    DiagnosticsOverflow { limit: usize },

    #[error("Incompatible inputs: {0}")]
    IncompatibleInputs(String),

    #[error("Unreadable probe output for {path}: {message}")]
    Probe { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ProcessError {
    /// Captured processor stderr, when there is any.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            ProcessError::Failed { diagnostics, .. } if !diagnostics.trim().is_empty() => {
                Some(diagnostics)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_parses_known_names() {
        assert_eq!("filter".parse::<ConcatStrategy>(), Ok(ConcatStrategy::FilterGraph));
        assert_eq!(" Manifest ".parse::<ConcatStrategy>(), Ok(ConcatStrategy::Manifest));
        assert_eq!("list".parse::<ConcatStrategy>(), Ok(ConcatStrategy::Manifest));
        assert!("bogus".parse::<ConcatStrategy>().is_err());
    }

    #[test]
    fn default_strategy_tolerates_mixed_inputs() {
        assert_eq!(ConcatStrategy::default(), ConcatStrategy::FilterGraph);
    }

    #[test]
    fn blank_diagnostics_are_hidden() {
        let err = ProcessError::Failed {
            program: "ffmpeg".into(),
            status: "exit status: 1".into(),
            diagnostics: "  \n".into(),
        };
        assert_eq!(err.diagnostics(), None);

        let err = ProcessError::Failed {
            program: "ffmpeg".into(),
            status: "exit status: 1".into(),
            diagnostics: "Invalid data found".into(),
        };
        assert_eq!(err.diagnostics(), Some("Invalid data found"));
    }
}
