use super::config::PostgrestConfig;
use super::query::TableQuery;
use crate::common::{DatabaseError, DatabaseResult};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// HTTP client for one PostgREST endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct PostgrestClient {
    http: reqwest::Client,
    rest_url: String,
}

impl PostgrestClient {
    pub fn new(config: &PostgrestConfig) -> DatabaseResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.api_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.api_key))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| DatabaseError::ConfigError(e.to_string()))?;

        Ok(Self {
            http,
            rest_url: config.rest_url(),
        })
    }

    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    /// Starts a query against `table`.
    pub fn from(&self, table: impl Into<String>) -> TableQuery<'_> {
        TableQuery::new(self, table.into())
    }

    /// Calls a stored procedure: `POST /rpc/{function}` with `params` as the body.
    #[instrument(skip(self, params))]
    pub async fn rpc<P, T>(&self, function: &str, params: &P) -> DatabaseResult<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/rpc/{}", self.rest_url, function);
        let response = self.http.post(url).json(params).send().await?;
        decode(response).await
    }

    /// `GET {rest_url}/`: succeeds on any 2xx.
    pub async fn ping(&self) -> DatabaseResult<()> {
        let response = self.http.get(format!("{}/", self.rest_url)).send().await?;
        ensure_success(response).await.map(|_| ())
    }

    pub(crate) fn get(&self, table: &str) -> RequestBuilder {
        self.http.get(format!("{}/{}", self.rest_url, table))
    }

    pub(crate) fn post(&self, table: &str) -> RequestBuilder {
        self.http.post(format!("{}/{}", self.rest_url, table))
    }
}

fn header_value(raw: &str) -> DatabaseResult<HeaderValue> {
    HeaderValue::from_str(raw)
        .map_err(|e| DatabaseError::ConfigError(format!("invalid API key header: {e}")))
}

async fn ensure_success(response: Response) -> DatabaseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), %body, "Store request rejected");
    Err(DatabaseError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> DatabaseResult<T> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| DatabaseError::Decode(e.to_string()))
}

/// Like [`decode`], but a successful response with no body yields no rows.
pub(crate) async fn decode_allow_empty<T: DeserializeOwned>(
    response: Response,
) -> DatabaseResult<Vec<T>> {
    let response = ensure_success(response).await?;
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| DatabaseError::Decode(e.to_string()))
}


#[cfg(test)]
mod tests {
    use super::test_server::spawn;
    use super::*;
    use axum::{Json, Router, http::HeaderMap as AxumHeaders, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_rpc_posts_params_with_credentials() {
        let router = Router::new().route(
            "/rest/v1/rpc/match_scholarships",
            post(|headers: AxumHeaders, Json(body): Json<Value>| async move {
                assert_eq!(headers["apikey"], "anon");
                assert_eq!(headers["authorization"], "Bearer anon");
                Json(json!([{ "id": 1, "count": body["match_count"] }]))
            }),
        );
        let base = spawn(router).await;
        let client = PostgrestClient::new(&PostgrestConfig::new(base, "anon")).unwrap();

        let rows: Vec<Value> = client
            .rpc("match_scholarships", &json!({ "match_count": 10 }))
            .await
            .unwrap();

        assert_eq!(rows, vec![json!({ "id": 1, "count": 10 })]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let router = Router::new().route(
            "/rest/v1/rpc/missing",
            post(|| async { (StatusCode::NOT_FOUND, "no such function") }),
        );
        let base = spawn(router).await;
        let client = PostgrestClient::new(&PostgrestConfig::new(base, "anon")).unwrap();

        let err = client
            .rpc::<_, Vec<Value>>("missing", &json!({}))
            .await
            .unwrap_err();

        match err {
            DatabaseError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such function");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let router = Router::new().route("/rest/v1/rpc/bad", post(|| async { "not json" }));
        let base = spawn(router).await;
        let client = PostgrestClient::new(&PostgrestConfig::new(base, "anon")).unwrap();

        let err = client
            .rpc::<_, Vec<Value>>("bad", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Decode(_)));
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let err = PostgrestClient::new(&PostgrestConfig::new("http://localhost", "bad\nkey"))
            .unwrap_err();
        assert!(matches!(err, DatabaseError::ConfigError(_)));
    }
}
