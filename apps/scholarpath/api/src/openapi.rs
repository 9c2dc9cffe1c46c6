use utoipa::OpenApi;

/// Application-level document: info, shared schemas and the landing route
#[derive(OpenApi)]
#[openapi(
    paths(crate::api::welcome),
    components(
        schemas(
            axum_helpers::ErrorResponse,
            axum_helpers::HealthResponse,
            axum_helpers::ReadyResponse,
            crate::api::Welcome
        )
    ),
    info(
        title = "ScholarPath.ai API",
        version = "0.1.0",
        description = "Scholarship search, semantic search and saved scholarships"
    ),
    tags((name = "meta", description = "Service information"))
)]
struct AppDoc;

/// Full API document. Domain routes live at the root, so their documents
/// are merged rather than nested under a prefix.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = AppDoc::openapi();
        doc.merge(domain_scholarships::handlers::ApiDoc::openapi());
        doc
    }
}
