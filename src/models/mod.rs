//! Core data models for the Landed Cost Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod line_item;
mod report;
mod settings;
mod shipment;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, CostBreakdown, ImportationResult, OverheadShares,
    ShipmentTotals, UnitPrice,
};
pub use line_item::LineItem;
pub use report::{Report, ReportSeries};
pub use settings::ShipmentSettings;
pub use shipment::Shipment;
