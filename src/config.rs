//! Service list configuration
//!
//! The list of downstream services to probe is loaded once at startup from
//! a JSON file (`CONFIG_PATH`, default `./config.json`). Any failure to
//! read, parse, or validate the file downgrades to a built-in default list
//! with a warning; config loading never fails the process.

use crate::server::ReadinessState;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Config file location when CONFIG_PATH is unset
const DEFAULT_CONFIG_PATH: &str = "./config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate serviceId: {0}")]
    DuplicateId(String),
}

/// One downstream service to probe
///
/// `service_id` is the identity: unique within a config, used as the URL
/// path segment for the per-service status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub service_id: String,
    pub service_name: String,
    pub ip_address: String,
    pub port: u16,
    pub protocol: String,
}

/// Full service list, order preserved from the source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    pub servers: Vec<Service>,
}

impl Config {
    /// Reject configs where two entries share a serviceId
    fn validate(self) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for service in &self.servers {
            if !seen.insert(service.service_id.as_str()) {
                return Err(ConfigError::DuplicateId(service.service_id.clone()));
            }
        }
        Ok(self)
    }
}

/// Read and validate a config file
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let data = std::fs::read_to_string(path)?;
    let cfg: Config = serde_json::from_str(&data)?;
    cfg.validate()
}

/// Load the service list from `CONFIG_PATH` (default `./config.json`)
///
/// Falls back to [`default_config`] on any error. Marks the process ready
/// once loading completes, whichever path was taken.
pub fn load(readiness: &ReadinessState) -> Config {
    let path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from_path(Path::new(&path), readiness)
}

/// Load the service list from an explicit path, falling back to defaults
pub fn load_from_path(path: &Path, readiness: &ReadinessState) -> Config {
    let cfg = match read_config(path) {
        Ok(cfg) => {
            info!(path = %path.display(), servers = cfg.servers.len(), "Loaded service config");
            cfg
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Config unusable, using defaults");
            default_config()
        }
    };

    readiness.set_ready();
    cfg
}

/// Built-in service list used when no valid config file is present
pub fn default_config() -> Config {
    Config {
        servers: vec![
            Service {
                service_id: "dc_depops_sp".to_string(),
                service_name: "DevOps та Kubernetes 3.0 Status Page".to_string(),
                ip_address: "34.116.191.131".to_string(),
                port: 80,
                protocol: "http".to_string(),
            },
            Service {
                service_id: "google".to_string(),
                service_name: "Google".to_string(),
                ip_address: "google.com".to_string(),
                port: 80,
                protocol: "http".to_string(),
            },
            Service {
                service_id: "olekluk".to_string(),
                service_name: "OlekLUk".to_string(),
                ip_address: "34.133.93.117".to_string(),
                port: 80,
                protocol: "http".to_string(),
            },
        ],
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
