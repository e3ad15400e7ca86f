//! HTTP request handlers for the NI calculation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{NiCalculationResult, NiCalculator};
use crate::error::EngineResult;

use super::request::{DirectorsNiCalculationRequest, NiCalculationRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ni/calculate", post(calculate_handler))
        .route("/ni/directors", post(directors_handler))
        .with_state(state)
}

/// Handler for POST /ni/calculate.
///
/// Calculates employee and employer Class 1 NI for one period's nicable pay.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<NiCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing NI calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = request.validate().and_then(|()| {
        NiCalculator::for_pay_date(state.reference_data(), request.pay_date(), request.periods)?
            .calculate(request.ni_category, request.nicable_pay)
    });

    respond(correlation_id, start_time, outcome)
}

/// Handler for POST /ni/directors.
///
/// Calculates a company director's NI for the period from year-to-date figures.
async fn directors_handler(
    State(state): State<AppState>,
    payload: Result<Json<DirectorsNiCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing directors' NI calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let outcome = request.validate().and_then(|()| {
        NiCalculator::for_pay_date(state.reference_data(), request.pay_date(), 1)?
            .calculate_directors(
                request.method,
                request.ni_category,
                request.period_pay,
                request.ytd_pay_before_period,
                request.ytd_employee_ni,
                request.ytd_employer_ni,
                request.pro_rata_factor,
                request.ytd_earnings_breakdown.as_ref(),
            )
    });

    respond(correlation_id, start_time, outcome)
}

fn respond(
    correlation_id: Uuid,
    start_time: Instant,
    outcome: EngineResult<NiCalculationResult>,
) -> Response {
    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                ni_category = %result.ni_category,
                nicable_pay = %result.nicable_pay,
                total_contribution = %result.total_contribution,
                duration_us = start_time.elapsed().as_micros(),
                "NI calculation completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(result),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "NI calculation failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
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

    ApiErrorResponse {
        status: StatusCode::BAD_REQUEST,
        error,
    }
    .into_response()
}
