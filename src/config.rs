//! Configuration management for Gatehouse.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GatehouseError, Result};
use crate::ratelimit::PolicySet;

/// Main configuration for the Gatehouse service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatehouseConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limit policies, one per scope
    #[serde(default)]
    pub policies: PolicySet,
}

impl Default for GatehouseConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            policies: PolicySet::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:8081".parse().unwrap()
}

impl GatehouseConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GatehouseConfig = serde_yaml::from_str(yaml)
            .map_err(|e| GatehouseError::Config(format!("Failed to parse config: {}", e)))?;
        config.policies.validate()?;
        Ok(config)
    }
}
