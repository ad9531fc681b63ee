//! HTTP API module for the Fara'id engine.
//!
//! This module provides the REST API endpoints for distributing an estate
//! and for listing the heir catalogue.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, DeceasedRequest, EstateRequest, HeirRequest};
pub use response::{
    ApiError, ApiErrorResponse, CalculationResponse, HeirCategoriesResponse, HeirCategoryInfo,
};
pub use state::AppState;
