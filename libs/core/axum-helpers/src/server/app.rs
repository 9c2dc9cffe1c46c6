use super::shutdown::shutdown_signal;
use crate::errors::handlers::not_found;
use crate::http::{CorsConfig, security_headers};
use axum::{Json, Router, middleware, routing::get};
use core_config::{ConfigError, FromEnv, server::ServerConfig};
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable as RedocServable};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Wraps the domain routes with documentation and cross-cutting layers.
///
/// - `GET /api-docs/openapi.json` plus Redoc (`/redoc`), RapiDoc (`/rapidoc`)
///   and Scalar (`/scalar`) viewers
/// - domain routes merged at the root, with their state already applied
/// - JSON 404 fallback
/// - request tracing, security headers, CORS (`CORS_ALLOWED_ORIGIN`) and
///   response compression
///
/// Health and readiness routes are merged by the binary afterwards.
pub fn create_router<T>(apis: Router) -> Result<Router, ConfigError>
where
    T: OpenApi + 'static,
{
    let cors = CorsConfig::from_env()?;
    info!(?cors, "CORS configured");
    let cors_layer = cors.layer()?;

    let doc = T::openapi();

    let router = Router::new()
        .route(
            OPENAPI_JSON_PATH,
            get({
                let doc = doc.clone();
                move || {
                    let doc = doc.clone();
                    async move { Json(doc) }
                }
            }),
        )
        .merge(Redoc::with_url("/redoc", doc.clone()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", doc))
        .merge(apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` for at most
/// `shutdown_timeout`.
///
/// In-flight requests drain before cleanup starts.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "probe"))]
    struct ProbeDoc;

    fn router() -> Router {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            create_router::<ProbeDoc>(Router::new().route("/ping", get(|| async { "pong" })))
                .unwrap()
        })
    }

    async fn get_status(uri: &str) -> StatusCode {
        router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_routes_are_merged_at_root() {
        assert_eq!(get_status("/ping").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path_is_json_not_found() {
        let response = router()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["info"]["title"], "probe");
    }

    #[tokio::test]
    async fn test_doc_viewers_are_mounted() {
        assert_eq!(get_status("/redoc").await, StatusCode::OK);
        assert_eq!(get_status("/rapidoc").await, StatusCode::OK);
        assert_eq!(get_status("/scalar").await, StatusCode::OK);
    }
}
