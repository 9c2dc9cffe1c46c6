use crate::{env_parse, ConfigError, FromEnv};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

const DEFAULT_PORT: u16 = 8080;

/// HTTP listener settings.
///
/// `HOST` must be an IP literal (default `0.0.0.0`); `PORT` defaults to 8080.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self { host, port }
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_parse("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: env_parse("PORT", DEFAULT_PORT)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_listen_on_all_interfaces() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::default());
            assert_eq!(config.address().to_string(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_loopback_on_custom_port() {
        temp_env::with_vars([("HOST", Some("127.0.0.1")), ("PORT", Some("8000"))], || {
            let config = ServerConfig::from_env().unwrap();
            assert!(config.address().ip().is_loopback());
            assert_eq!(config.address().port(), 8000);
        });
    }

    #[test]
    fn test_ipv6_host() {
        temp_env::with_var("HOST", Some("::1"), || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address().to_string(), "[::1]:8080");
        });
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        temp_env::with_var("PORT", Some("99999"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("PORT"));
        });
        temp_env::with_var("HOST", Some("localhost"), || {
            let err = ServerConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("HOST"));
        });
    }
}
