//! Configuration types for the Landed Cost Engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::Deserialize;

use crate::models::{LineItem, Shipment};

/// Calculator defaults from `defaults.yaml`.
///
/// `shipment` is the state a reset restores; `new_item` is the row appended
/// when a user adds an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorDefaults {
    /// The initial shipment.
    pub shipment: Shipment,
    /// Template for newly added rows.
    pub new_item: LineItem,
}

/// HTTP server settings from `server.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl ServerConfig {
    /// Returns the `host:port` address to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Complete calculator configuration.
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    defaults: CalculatorDefaults,
    server: ServerConfig,
}

impl CalculatorConfig {
    /// Creates a new configuration.
    pub fn new(defaults: CalculatorDefaults, server: ServerConfig) -> Self {
        Self { defaults, server }
    }

    /// Returns the calculator defaults.
    pub fn defaults(&self) -> &CalculatorDefaults {
        &self.defaults
    }

    /// Returns the server settings.
    pub fn server(&self) -> &ServerConfig {
        &self.server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config: ServerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_server_config_bind_addr() {
        let config: ServerConfig = serde_yaml::from_str("host: 0.0.0.0\nport: 3000\n").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_calculator_defaults_deserialize() {
        let yaml = r#"
shipment:
  settings:
    bank_expenses: "25"
  items: []
  notes: []
new_item:
  quantity: "1"
  unit_weight: "0"
  unit_cost: "0"
  tariff_rate: "0"
  margin: "0"
  unit_price: "-1"
"#;
        let defaults: CalculatorDefaults = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(defaults.shipment.settings.bank_expenses.to_string(), "25");
        assert_eq!(defaults.new_item.unit_price.to_string(), "-1");
    }
}
