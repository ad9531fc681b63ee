//! Response types for the Fara'id engine API.
//!
//! This module defines the success envelopes returned by the endpoints and
//! the error response structures used by the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{CategoryConfig, RuleSetMetadata};
use crate::error::EngineError;
use crate::models::{Gender, HeirCategory, HeirGroup, InheritanceResult};

/// Response body of the `/calculate` endpoint.
///
/// The envelope carries the request-specific metadata so that the result
/// itself stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the result.
    pub engine_version: String,
    /// The distribution.
    pub result: InheritanceResult,
}

impl CalculationResponse {
    /// Wraps a result with a fresh id and the current time.
    pub fn new(result: InheritanceResult) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            result,
        }
    }
}

/// One entry of the heir catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeirCategoryInfo {
    /// Category code used in requests.
    pub code: HeirCategory,
    /// English display name.
    pub name: String,
    /// Arabic display name.
    pub arabic_name: String,
    /// Who belongs to the category.
    pub description: String,
    /// Gender of the members.
    pub gender: Gender,
    /// Relationship group.
    pub group: HeirGroup,
    /// Most members the category may have.
    pub max_count: u32,
}

impl HeirCategoryInfo {
    /// Combines a category with its catalogue entry.
    pub fn new(category: HeirCategory, config: &CategoryConfig) -> Self {
        Self {
            code: category,
            name: config.name.clone(),
            arabic_name: config.arabic_name.clone(),
            description: config.description.clone(),
            gender: category.gender(),
            group: category.group(),
            max_count: config.max_count,
        }
    }
}

/// Response body of the `/heir-categories` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeirCategoriesResponse {
    /// The rule set the catalogue belongs to.
    pub rule_set: RuleSetMetadata,
    /// Every heir category in display order.
    pub categories: Vec<HeirCategoryInfo>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates an unknown heir category error response.
    pub fn unknown_heir_category(code: &str) -> Self {
        Self::with_details(
            "UNKNOWN_HEIR_CATEGORY",
            format!("Unknown heir category: {}", code),
            "See GET /heir-categories for the supported category codes",
        )
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::UnknownHeirCategory { code } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::unknown_heir_category(&code),
            },
            EngineError::InvalidHeir { category, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_HEIR",
                    format!("Invalid heir '{}': {}", category, message),
                    "The heir selection contains invalid information",
                ),
            },
            EngineError::InvalidEstate { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_ESTATE",
                    format!("Invalid estate field '{}': {}", field, message),
                    "The estate figures contain invalid information",
                ),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
