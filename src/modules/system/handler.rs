use super::dto::{HealthResponse, ServiceInfo};
use axum::Json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Service info
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service status and available endpoints", body = ServiceInfo)
    ),
    tag = "System"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        endpoints: vec![
            "GET /".to_string(),
            "GET /health".to_string(),
            "POST /concat-videos".to_string(),
        ],
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "System"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
    })
}
