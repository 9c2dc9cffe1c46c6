use core_config::{ConfigError, FromEnv, env_or_default};

pub const DEFAULT_PLACEHOLDER_USER_ID: &str = "mock-user-id";

/// Identity settings.
///
/// - `PLACEHOLDER_USER_ID`: user id returned by the static resolver
///   (default `mock-user-id`)
#[derive(Clone, Debug)]
pub struct IdentityConfig {
    pub placeholder_user_id: String,
}

impl FromEnv for IdentityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let placeholder_user_id = env_or_default("PLACEHOLDER_USER_ID", DEFAULT_PLACEHOLDER_USER_ID);

        if placeholder_user_id.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "PLACEHOLDER_USER_ID".to_string(),
                details: "must not be blank".to_string(),
            });
        }

        Ok(Self {
            placeholder_user_id,
        })
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            placeholder_user_id: DEFAULT_PLACEHOLDER_USER_ID.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_config_defaults() {
        temp_env::with_var_unset("PLACEHOLDER_USER_ID", || {
            let config = IdentityConfig::from_env().unwrap();
            assert_eq!(config.placeholder_user_id, "mock-user-id");
        });
    }

    #[test]
    fn test_identity_config_custom() {
        temp_env::with_var("PLACEHOLDER_USER_ID", Some("student-1"), || {
            let config = IdentityConfig::from_env().unwrap();
            assert_eq!(config.placeholder_user_id, "student-1");
        });
    }

    #[test]
    fn test_identity_config_blank_rejected() {
        temp_env::with_var("PLACEHOLDER_USER_ID", Some("   "), || {
            assert!(IdentityConfig::from_env().is_err());
        });
    }
}
