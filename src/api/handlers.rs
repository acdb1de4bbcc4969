//! HTTP request handlers for the Landed Cost Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_importation;
use crate::error::EngineResult;
use crate::models::Shipment;
use crate::report::build_report;
use crate::validation::{ensure_submittable, validate_or_error};

use super::request::ReportRequest;
use super::response::{ApiError, ApiErrorResponse, CalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/report", post(report_handler))
        .route("/shipment/template", get(template_handler))
        .route("/shipment/submit", post(submit_handler))
        .with_state(state)
}

/// Handler for POST /calculate.
///
/// Validates the shipment, prices every item, builds the report and returns
/// the shipment with the computed prices merged in.
async fn calculate_handler(
    payload: Result<Json<Shipment>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let Json(shipment) = payload.map_err(|rejection| rejection_error(rejection, correlation_id))?;

    validate_or_error(&shipment).inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Shipment failed validation");
    })?;

    let response = perform_calculation(shipment, correlation_id)?;
    Ok(json_response(StatusCode::OK, &response))
}

/// Handler for POST /shipment/submit.
///
/// Like `/calculate`, but rejects shipments without items.
async fn submit_handler(
    payload: Result<Json<Shipment>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing submission");

    let Json(shipment) = payload.map_err(|rejection| rejection_error(rejection, correlation_id))?;

    ensure_submittable(&shipment).inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Shipment rejected");
    })?;

    let response = perform_calculation(shipment, correlation_id)?;
    Ok(json_response(StatusCode::OK, &response))
}

/// Handler for POST /report.
async fn report_handler(
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiErrorResponse> {
    let correlation_id = Uuid::new_v4();

    let Json(request) = payload.map_err(|rejection| rejection_error(rejection, correlation_id))?;

    let report = build_report(&request.breakdowns);
    info!(
        correlation_id = %correlation_id,
        categories = report.categories.len(),
        "Report built"
    );
    Ok(json_response(StatusCode::OK, &report))
}

/// Handler for GET /shipment/template.
async fn template_handler(State(state): State<AppState>) -> Response {
    json_response(StatusCode::OK, &state.shipment_template())
}

/// Runs the engine and report builder over a validated shipment.
fn perform_calculation(
    mut shipment: Shipment,
    correlation_id: Uuid,
) -> EngineResult<CalculationResponse> {
    let start_time = Instant::now();

    let result = calculate_importation(&shipment).inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Calculation failed");
    })?;
    let report = build_report(&result.breakdowns);
    let updated = shipment.apply_prices(&result.unit_prices);

    info!(
        correlation_id = %correlation_id,
        items = shipment.items.len(),
        priced = updated,
        warnings = result.audit_trace.warnings.len(),
        duration_us = start_time.elapsed().as_micros(),
        "Calculation completed"
    );

    Ok(CalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        shipment,
        result,
        report,
    })
}

/// Converts a JSON extraction failure into a 400 error.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
