//! Configuration loading and management for the Landed Cost Engine.
//!
//! This module loads calculator defaults (the initial shipment and the
//! new-row template) and server settings from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use landed_cost_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Listening on {}", config.server().bind_addr());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CalculatorConfig, CalculatorDefaults, ServerConfig};
