use super::client::PostgrestClient;
use crate::common::DatabaseError;
use tracing::debug;

/// Verifies the store answers authenticated requests.
///
/// Used by the readiness endpoint and the startup probe.
pub async fn check_health(client: &PostgrestClient) -> Result<(), DatabaseError> {
    debug!("Running store health check");

    client.ping().await.map_err(|e| {
        DatabaseError::HealthCheckFailed(format!("PostgREST health check failed: {e}"))
    })?;

    debug!("Store health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::client::test_server::spawn;
    use super::super::config::PostgrestConfig;
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};

    #[tokio::test]
    async fn test_healthy_store() {
        let base = spawn(Router::new().route("/rest/v1/", get(|| async { "{}" }))).await;
        let client = PostgrestClient::new(&PostgrestConfig::new(base, "anon")).unwrap();
        assert!(check_health(&client).await.is_ok());
    }

    #[tokio::test]
    async fn test_unauthorized_store_is_unhealthy() {
        let base = spawn(
            Router::new().route("/rest/v1/", get(|| async { StatusCode::UNAUTHORIZED })),
        )
        .await;
        let client = PostgrestClient::new(&PostgrestConfig::new(base, "anon")).unwrap();

        let err = check_health(&client).await.unwrap_err();
        assert!(matches!(err, DatabaseError::HealthCheckFailed(_)));
    }
}
