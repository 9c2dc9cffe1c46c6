use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse, env_required};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a PostgREST endpoint.
///
/// `url` is the project base URL (e.g. `https://xyz.supabase.co`); the REST
/// API lives under `{url}/rest/v1`.
#[derive(Clone)]
pub struct PostgrestConfig {
    pub url: String,
    /// Sent as both the `apikey` header and the bearer token
    pub api_key: String,
    pub timeout_secs: u64,
}

impl PostgrestConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Environment variables:
/// - `SUPABASE_URL` (required)
/// - `SUPABASE_KEY` (required)
/// - `SUPABASE_TIMEOUT_SECS` (optional, default: 30)
#[cfg(feature = "config")]
impl FromEnv for PostgrestConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_required("SUPABASE_URL")?;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::ParseError {
                key: "SUPABASE_URL".to_string(),
                details: format!("expected an http(s) URL, got '{url}'"),
            });
        }

        let api_key = env_required("SUPABASE_KEY")?;
        let timeout_secs = env_parse("SUPABASE_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            url,
            api_key,
            timeout_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_url_strips_trailing_slash() {
        let config = PostgrestConfig::new("https://xyz.supabase.co/", "key");
        assert_eq!(config.rest_url(), "https://xyz.supabase.co/rest/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = PostgrestConfig::new("https://xyz.supabase.co", "super-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://xyz.supabase.co")),
                ("SUPABASE_KEY", Some("anon")),
                ("SUPABASE_TIMEOUT_SECS", Some("5")),
            ],
            || {
                let config = PostgrestConfig::from_env().unwrap();
                assert_eq!(config.api_key, "anon");
                assert_eq!(config.timeout(), Duration::from_secs(5));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_missing_key() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("https://xyz.supabase.co")),
                ("SUPABASE_KEY", None),
            ],
            || {
                let err = PostgrestConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("SUPABASE_KEY"));
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_from_env_rejects_non_http_url() {
        temp_env::with_vars(
            [
                ("SUPABASE_URL", Some("postgres://localhost")),
                ("SUPABASE_KEY", Some("anon")),
            ],
            || {
                assert!(PostgrestConfig::from_env().is_err());
            },
        );
    }
}
