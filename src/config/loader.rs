//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading calculator
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{LineItem, Shipment};

use super::types::{CalculatorConfig, CalculatorDefaults, ServerConfig};

/// Loads and provides access to calculator configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── defaults.yaml   # Initial shipment and new-row template
/// └── server.yaml     # HTTP bind address
/// ```
///
/// # Example
///
/// ```no_run
/// use landed_cost_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let shipment = loader.initial_shipment();
/// println!("Starting with {} items", shipment.items.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CalculatorConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - A required file is missing
    /// - A file contains invalid YAML
    /// - A required field is missing from the configuration
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let defaults = Self::load_yaml::<CalculatorDefaults>(&path.join("defaults.yaml"))?;
        let server = Self::load_yaml::<ServerConfig>(&path.join("server.yaml"))?;

        Ok(Self {
            config: CalculatorConfig::new(defaults, server),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        self.config.server()
    }

    /// Returns a fresh copy of the initial shipment, the state a reset restores.
    pub fn initial_shipment(&self) -> Shipment {
        self.config.defaults().shipment.clone()
    }

    /// Returns a fresh copy of the new-row template.
    pub fn new_item(&self) -> LineItem {
        self.config.defaults().new_item.clone()
    }
}
