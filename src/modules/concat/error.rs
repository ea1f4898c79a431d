use axum::http::StatusCode;
use std::io;
use thiserror::Error;

use crate::infrastructure::http::client::FetchError;
use crate::infrastructure::media::ProcessError;

/// Longest stderr tail echoed back to the caller. The full text is logged.
const MAX_DETAILS_DIAGNOSTICS: usize = 4 * 1024;

#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    DownloadFailed(#[from] FetchError),

    #[error("Processing failed: {message}")]
    ProcessingFailed {
        message: String,
        diagnostics: Option<String>,
    },

    #[error("Internal failure: {0}")]
    InternalFailure(String),
}

impl ConcatError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn processing_failed(message: impl Into<String>) -> Self {
        Self::ProcessingFailed {
            message: message.into(),
            diagnostics: None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ConcatError::InvalidInput(_) => "InvalidInput",
            ConcatError::DownloadFailed(_) => "DownloadFailed",
            ConcatError::ProcessingFailed { .. } => "ProcessingFailed",
            ConcatError::InternalFailure(_) => "InternalFailure",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ConcatError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Proximate cause, with the tail of any processor stderr appended.
    pub fn details(&self) -> String {
        match self {
            ConcatError::ProcessingFailed {
                message,
                diagnostics: Some(diagnostics),
            } => format!("{}: {}", message, tail(diagnostics.trim(), MAX_DETAILS_DIAGNOSTICS)),
            ConcatError::ProcessingFailed { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<ProcessError> for ConcatError {
    fn from(e: ProcessError) -> Self {
        Self::ProcessingFailed {
            message: e.to_string(),
            diagnostics: e.diagnostics().map(str::to_string),
        }
    }
}

impl From<io::Error> for ConcatError {
    fn from(e: io::Error) -> Self {
        Self::InternalFailure(e.to_string())
    }
}

fn tail(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }

    let mut start = s.len() - max;
    while !s.is_char_boundary(start) {
        start += 1;
    }
    &s[start..]
}
