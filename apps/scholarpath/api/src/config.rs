use axum_helpers::IdentityConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, server::ServerConfig};
use database::postgrest::PostgrestConfig;
use domain_scholarships::{OpenAIConfig, SavedScholarshipsConfig};
use tracing::warn;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration
/// Composes shared config components from the libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub store: PostgrestConfig,
    /// `None` when `OPENAI_API_KEY` is unset; vector search then always
    /// falls back to text search
    pub embeddings: Option<OpenAIConfig>,
    pub saved: SavedScholarshipsConfig,
    pub identity: IdentityConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let store = PostgrestConfig::from_env()?; // Required - will fail if not set

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            store,
            embeddings: optional(OpenAIConfig::from_env())?,
            saved: SavedScholarshipsConfig::from_env()?,
            identity: IdentityConfig::from_env()?,
        })
    }
}

/// A missing required variable disables the component; a malformed one is
/// still an error.
fn optional<T>(result: Result<T, ConfigError>) -> Result<Option<T>, ConfigError> {
    match result {
        Ok(config) => Ok(Some(config)),
        Err(ConfigError::MissingEnvVar(key)) => {
            warn!("{} not set, semantic search disabled", key);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
