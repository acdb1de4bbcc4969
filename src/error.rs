//! Error types for the Landed Cost Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur around a landed cost calculation.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the Landed Cost Engine.
///
/// Degenerate shipments (no items, zero total weight or cost) are not errors;
/// the engine returns zero or empty outputs for them instead.
///
/// # Example
///
/// ```
/// use landed_cost_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/defaults.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/defaults.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A shipment field failed validation.
    #[error("Invalid shipment field '{field}': {message}")]
    InvalidShipment {
        /// The path of the offending field (e.g. `items[0].margin`).
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A shipment was submitted without any line items.
    #[error("Shipment has no items")]
    EmptyShipment,

    /// A line item index was outside the shipment's item list.
    #[error("Item {index} not found (shipment has {len} items)")]
    ItemNotFound {
        /// The requested index.
        index: usize,
        /// The number of items in the shipment.
        len: usize,
    },

    /// A note index was outside the shipment's note list.
    #[error("Note {index} not found (shipment has {len} notes)")]
    NoteNotFound {
        /// The requested index.
        index: usize,
        /// The number of notes in the shipment.
        len: usize,
    },

    /// An item's margin leaves its sale price undefined.
    #[error("Item {item_index} has margin {margin}; sale price requires a margin below 1")]
    InvalidMargin {
        /// Position of the item in the shipment.
        item_index: usize,
        /// The offending margin.
        margin: Decimal,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Builds a [`EngineError::CalculationError`] for a result too large to
    /// hold in a `Decimal`.
    pub fn overflow(operation: impl std::fmt::Display) -> Self {
        EngineError::CalculationError {
            message: format!("{} overflowed the supported decimal range", operation),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
