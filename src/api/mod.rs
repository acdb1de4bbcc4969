//! HTTP API module for the Landed Cost Engine.
//!
//! This module provides the REST endpoints for calculating landed costs,
//! building reports and fetching the calculator's starting state.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::ReportRequest;
pub use response::{ApiError, ApiErrorResponse, CalculationResponse, ShipmentTemplate};
pub use state::AppState;
