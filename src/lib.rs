//! Landed Cost Engine for imported goods
//!
//! This crate estimates the landed cost of each line item in an import
//! shipment: shipment-level overheads are split across items by weight or by
//! value, import duty is added, and a sale price is derived from each item's
//! target margin. A report builder turns the per-item breakdowns into chart
//! series, and an axum API exposes both over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod validation;
