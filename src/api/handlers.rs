//! HTTP request handlers for the Fara'id engine API.
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
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_inheritance;
use crate::config::ConfigLoader;
use crate::error::EngineError;
use crate::models::{DeceasedInfo, Estate, HeirCategory, InheritanceResult};

use super::request::CalculationRequest;
use super::response::{
    ApiError, ApiErrorResponse, CalculationResponse, HeirCategoriesResponse, HeirCategoryInfo,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/heir-categories", get(heir_categories_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(err: EngineError) -> Response {
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a calculation request and returns the distribution of the estate.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's description of the problem
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") || body_text.contains("unknown variant")
                    {
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
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let start_time = Instant::now();
    match perform_calculation(request, state.config()) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                heirs = result.heir_shares.len(),
                blocked = result.blocked_heirs.len(),
                net_estate = %result.net_estate,
                awl_applied = result.awl_applied,
                radd_applied = result.radd_applied,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, CalculationResponse::new(result))
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Calculation failed"
            );
            error_response(err)
        }
    }
}

/// Converts the request into domain types, validates it and runs the engine.
fn perform_calculation(
    request: CalculationRequest,
    config: &ConfigLoader,
) -> Result<InheritanceResult, EngineError> {
    let heirs = request.resolve_heirs(config)?;
    let deceased: DeceasedInfo = request.deceased.into();
    let estate: Estate = request.estate.into();
    estate.validate()?;

    calculate_inheritance(&deceased, &heirs, &estate, config.config())
}

/// Handler for GET /heir-categories endpoint.
///
/// Returns the heir catalogue for selection interfaces.
async fn heir_categories_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();

    let categories: Result<Vec<HeirCategoryInfo>, EngineError> = HeirCategory::ALL
        .iter()
        .map(|category| {
            config
                .category(*category)
                .map(|entry| HeirCategoryInfo::new(*category, entry))
        })
        .collect();

    match categories {
        Ok(categories) => json_response(
            StatusCode::OK,
            HeirCategoriesResponse {
                rule_set: config.rule_set().clone(),
                categories,
            },
        ),
        Err(err) => error_response(err),
    }
}
