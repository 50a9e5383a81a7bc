use std::net::SocketAddr;

use serde::Deserialize;
use url::Url;

use crate::{cors::CorsConfig, health::HealthConfig};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Prefix under which the API routes are mounted
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,
    #[serde(default)]
    pub environment: Environment,
    /// Externally reachable base URL, used to build recording links
    #[serde(default = "default_public_url")]
    pub public_url: Url,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            path_prefix: default_path_prefix(),
            environment: Environment::default(),
            public_url: default_public_url(),
            health: HealthConfig::default(),
            cors: None,
        }
    }
}

/// Deployment environment
///
/// Failure bodies carry diagnostic details only in development.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub const fn exposes_details(self) -> bool {
        matches!(self, Self::Development)
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_path_prefix() -> String {
    "/api".to_string()
}

fn default_public_url() -> Url {
    Url::parse("http://localhost:8080").expect("must be valid URL")
}
