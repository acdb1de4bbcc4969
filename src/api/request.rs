//! Request types for the Landed Cost Engine API.
//!
//! `/calculate` and `/shipment/submit` take a [`Shipment`](crate::models::Shipment)
//! body directly; this module holds the remaining request shapes.

use serde::{Deserialize, Serialize};

use crate::models::CostBreakdown;

/// Request body for the `/report` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Breakdowns from a previous calculation, in item order.
    #[serde(default)]
    pub breakdowns: Vec<CostBreakdown>,
}
