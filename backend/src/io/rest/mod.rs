//! # REST API Interface Layer
//!
//! Provides HTTP REST endpoints for the chore tracker. This layer handles:
//! - HTTP request/response serialization and deserialization
//! - Error translation from domain to HTTP status codes
//! - Request logging and monitoring
//!
//! ## Design Principles
//!
//! - **REST Compliance**: Following RESTful design patterns
//! - **Error Transparency**: Clear error messages for debugging
//! - **Domain Separation**: Pure translation layer without business logic
//!
//! Every error body has the same shape, `{"error": "..."}`, so clients only
//! need one decoding path. Storage failures are logged in full at the handler
//! and reported to the client as a generic internal error.

use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::domain::DomainError;

// Module declarations
pub mod chore_apis;
pub mod instance_apis;
pub mod payout_apis;
pub mod schedule_apis;

pub use chore_apis::*;
pub use instance_apis::*;
pub use payout_apis::*;
pub use schedule_apis::*;

/// Map a domain error to its HTTP status and JSON error body
pub(crate) fn domain_error_response(error: DomainError) -> (StatusCode, Json<Value>) {
    match error {
        DomainError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
        }
        DomainError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
        }
        DomainError::Integrity(message) => {
            (StatusCode::CONFLICT, Json(json!({ "error": message })))
        }
        DomainError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        ),
    }
}
