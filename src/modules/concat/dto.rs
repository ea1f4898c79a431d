use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /concat-videos`.
///
/// `video_urls` is kept untyped so that a missing field, a non-array value and
/// an empty array all surface as the same client error instead of a
/// deserialization rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConcatRequest {
    #[schema(value_type = Vec<String>, example = json!(["https://host/a.mp4", "https://host/b.mp4"]))]
    pub video_urls: Option<serde_json::Value>,
}
