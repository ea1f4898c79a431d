use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::system::handler::root,
        crate::modules::system::handler::health,
        crate::modules::concat::handler::concat_videos,
    ),
    components(
        schemas(
            crate::modules::system::dto::ServiceInfo,
            crate::modules::system::dto::HealthResponse,
            crate::modules::concat::dto::ConcatRequest,
            crate::common::response::ErrorBody,
        )
    ),
    tags(
        (name = "System", description = "Service status"),
        (name = "Concat", description = "Video concatenation")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| *p == "/"));
        assert!(paths.iter().any(|p| *p == "/health"));
        assert!(paths.iter().any(|p| *p == "/concat-videos"));
    }
}
