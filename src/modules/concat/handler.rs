use super::dto::ConcatRequest;
use super::error::ConcatError;
use super::service::{ConcatService, MISSING_URLS_MESSAGE};
use crate::common::response::{ApiError, ErrorBody, VideoAttachment};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Concatenate remote videos
///
/// Downloads every URL in order, joins them into one mp4 and returns it as an attachment.
#[utoipa::path(
    post,
    path = "/concat-videos",
    request_body = ConcatRequest,
    responses(
        (status = 200, description = "Concatenated video", content_type = "video/mp4", body = Vec<u8>),
        (status = 400, description = "video_urls missing, empty or not a list", body = ErrorBody),
        (status = 500, description = "Download or processing failure", body = ErrorBody)
    ),
    tag = "Concat"
)]
pub async fn concat_videos(
    State(state): State<AppState>,
    payload: Result<Json<ConcatRequest>, JsonRejection>,
) -> impl IntoResponse {
    let urls = match payload {
        Ok(Json(req)) => ConcatService::validate(req),
        Err(rejection) => {
            warn!("Unreadable concat request body: {}", rejection.body_text());
            Err(ConcatError::invalid_input(MISSING_URLS_MESSAGE))
        }
    };

    let urls = match urls {
        Ok(urls) => urls,
        Err(e) => {
            warn!("Rejected concat request: {}", e);
            return ApiError::bad_request(&e.to_string()).into_response();
        }
    };

    let job_id = Uuid::new_v4();
    info!(job_id = %job_id, count = urls.len(), "📦 Received concat job");

    match ConcatService::concatenate(state, job_id, urls).await {
        Ok(data) => {
            info!(job_id = %job_id, bytes = data.len(), "✅ Sending concatenated video");
            VideoAttachment(data).into_response()
        }
        Err(e) => {
            error!(job_id = %job_id, kind = e.kind(), "❌ Concat job failed: {}", e.details());
            ApiError::job_failure(job_id, &e).into_response()
        }
    }
}
