use super::client::PostgrestClient;
use super::config::PostgrestConfig;
use super::health::check_health;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry_with_backoff};
use tracing::info;

/// Builds a client and checks the store is reachable.
pub async fn connect(config: &PostgrestConfig) -> DatabaseResult<PostgrestClient> {
    let client = PostgrestClient::new(config)?;
    check_health(&client)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!(url = %config.url, "Connected to PostgREST store");
    Ok(client)
}

/// [`connect`] with exponential backoff; `None` uses [`RetryConfig::default`].
pub async fn connect_with_retry(
    config: PostgrestConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<PostgrestClient> {
    retry_with_backoff(|| connect(&config), retry_config.unwrap_or_default()).await
}

#[cfg(test)]
mod tests {
    use super::super::client::test_server::spawn;
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_connect_with_retry_recovers() {
        let calls = Arc::new(AtomicU32::new(0));
        let router = Router::new().route(
            "/rest/v1/",
            get({
                let calls = calls.clone();
                move || {
                    let calls = calls.clone();
                    async move {
                        if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                            StatusCode::SERVICE_UNAVAILABLE
                        } else {
                            StatusCode::OK
                        }
                    }
                }
            }),
        );
        let base = spawn(router).await;

        let retry = RetryConfig::new()
            .with_initial_delay(Duration::from_millis(5))
            .without_jitter();
        let client = connect_with_retry(PostgrestConfig::new(base, "anon"), Some(retry))
            .await
            .unwrap();

        assert!(client.rest_url().ends_with("/rest/v1"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_connect_fails_when_unreachable() {
        let config = PostgrestConfig::new("http://127.0.0.1:9", "anon").with_timeout_secs(1);
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConnectionFailed(_)));
    }
}
