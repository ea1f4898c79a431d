use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::concat::error::ConcatError;

pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";
pub const VIDEO_DISPOSITION: &str = "attachment; filename=concatenated.mp4";

/// Top-level message for every failure after input validation.
pub const JOB_FAILED_MESSAGE: &str = "Failed to concatenate videos";

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "jobId", skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

pub struct ApiError(pub ErrorBody, pub StatusCode);

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self(
            ErrorBody {
                error: message.to_string(),
                details: None,
                kind: None,
                job_id: None,
            },
            StatusCode::BAD_REQUEST,
        )
    }

    /// Maps a failed job to its response, tagged with the job id for log correlation.
    pub fn job_failure(job_id: Uuid, err: &ConcatError) -> Self {
        if let ConcatError::InvalidInput(message) = err {
            return Self::bad_request(message);
        }

        Self(
            ErrorBody {
                error: JOB_FAILED_MESSAGE.to_string(),
                details: Some(err.details()),
                kind: Some(err.kind().to_string()),
                job_id: Some(job_id),
            },
            err.status_code(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

/// The concatenated output, sent as a downloadable mp4.
pub struct VideoAttachment(pub Bytes);

impl IntoResponse for VideoAttachment {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, VIDEO_CONTENT_TYPE),
                (header::CONTENT_DISPOSITION, VIDEO_DISPOSITION),
            ],
            self.0,
        )
            .into_response()
    }
}
