use axum::{Router, middleware, routing::get};
use axum_helpers::{
    IdentityResolver, StaticIdentityResolver,
    server::{create_production_app, create_router, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_scholarships::{EmbeddingProvider, OpenAIProvider};
use observability::{init_metrics, metrics_handler, metrics_middleware};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    init_metrics().map_err(|e| eyre::eyre!("Metrics recorder failed: {}", e))?;

    info!(url = %config.store.url, "Connecting to PostgREST store");
    let store = database::postgrest::connect_with_retry(config.store.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("Store connection failed: {}", e))?;

    let embeddings: Option<Arc<dyn EmbeddingProvider>> = match config.embeddings.clone() {
        Some(openai) => {
            let provider = OpenAIProvider::new(openai)?;
            info!(model = %provider.model(), "Embedding provider configured");
            Some(Arc::new(provider))
        }
        None => {
            warn!("No embedding provider, vector search will use text search");
            None
        }
    };

    let identity_resolver: Arc<dyn IdentityResolver> = Arc::new(StaticIdentityResolver::new(
        config.identity.placeholder_user_id.clone(),
    ));

    let state = AppState {
        config,
        store,
        embeddings,
        identity_resolver,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check that pings the store
    // - /metrics: Prometheus exposition
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()))
        .merge(Router::new().route("/metrics", get(metrics_handler)))
        .layer(middleware::from_fn(metrics_middleware));

    info!("Starting ScholarPath API with production-ready shutdown (30s timeout)");

    let server_config = state.config.server;
    create_production_app(
        app,
        &server_config,
        Duration::from_secs(30), // 30s graceful shutdown timeout
        async move {
            // The store client is stateless HTTP; dropping it closes idle connections
            drop(state);
            info!("Released store and provider clients");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("ScholarPath API shutdown complete");
    Ok(())
}
