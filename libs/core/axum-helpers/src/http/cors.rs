use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Allowed browser origins, read from `CORS_ALLOWED_ORIGIN`.
///
/// - unset, empty, or `*`: any origin (no credentials)
/// - comma-separated list: exactly those origins, credentials allowed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsConfig {
    Permissive,
    Origins(Vec<String>),
}

impl CorsConfig {
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsConfig::Permissive
        } else {
            CorsConfig::Origins(origins)
        }
    }

    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        match self {
            CorsConfig::Permissive => Ok(create_permissive_cors_layer()),
            CorsConfig::Origins(origins) => {
                let values = origins
                    .iter()
                    .map(|o| o.parse::<HeaderValue>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| ConfigError::ParseError {
                        key: "CORS_ALLOWED_ORIGIN".to_string(),
                        details: e.to_string(),
                    })?;
                Ok(create_cors_layer(values))
            }
        }
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(std::env::var("CORS_ALLOWED_ORIGIN")
            .map(|raw| Self::parse(&raw))
            .unwrap_or(CorsConfig::Permissive))
    }
}

/// CORS layer restricted to `allowed_origins`.
///
/// Methods GET, POST and OPTIONS; headers Content-Type, Authorization and
/// Accept; credentials allowed; preflight cached for an hour.
pub fn create_cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// Any origin, any method, any header.
pub fn create_permissive_cors_layer() -> CorsLayer {
    CorsLayer::permissive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wildcard_and_empty_are_permissive() {
        assert_eq!(CorsConfig::parse("*"), CorsConfig::Permissive);
        assert_eq!(CorsConfig::parse(""), CorsConfig::Permissive);
        assert_eq!(CorsConfig::parse(" , "), CorsConfig::Permissive);
    }

    #[test]
    fn test_parse_origin_list() {
        assert_eq!(
            CorsConfig::parse("http://localhost:3000, https://scholarpath.ai"),
            CorsConfig::Origins(vec![
                "http://localhost:3000".to_string(),
                "https://scholarpath.ai".to_string()
            ])
        );
    }

    #[test]
    fn test_from_env_unset_is_permissive() {
        temp_env::with_var_unset("CORS_ALLOWED_ORIGIN", || {
            assert_eq!(CorsConfig::from_env().unwrap(), CorsConfig::Permissive);
        });
    }

    #[test]
    fn test_invalid_origin_is_config_error() {
        let config = CorsConfig::Origins(vec!["http://bad\norigin".to_string()]);
        let err = config.layer().unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOWED_ORIGIN"));
    }
}
