//! # REST API for Payouts and Earnings
//!
//! Endpoints for reading the payable total, recording payouts, and listing
//! past payouts.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::domain_error_response;
use crate::AppState;
use shared::{CreatePayoutRequest, TotalEarnedResponse};

/// Current payable total across all completed, unsettled chores
pub async fn get_total_earned(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/earnings");

    match state.earnings_service.total_earned().await {
        Ok(total_earned) => {
            (StatusCode::OK, Json(TotalEarnedResponse { total_earned })).into_response()
        }
        Err(e) => {
            error!("Failed to compute total earned: {}", e);
            domain_error_response(e).into_response()
        }
    }
}

/// Record a payout and settle all completed chores
pub async fn create_payout(
    State(state): State<AppState>,
    Json(request): Json<CreatePayoutRequest>,
) -> impl IntoResponse {
    info!("POST /api/payouts - request: {:?}", request);

    match state.payout_service.create_payout(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create payout: {}", e);
            domain_error_response(e).into_response()
        }
    }
}

/// Payout history, newest first
pub async fn list_payouts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/payouts");

    match state.payout_service.get_payouts().await {
        Ok(payouts) => (StatusCode::OK, Json(payouts)).into_response(),
        Err(e) => {
            error!("Failed to list payouts: {}", e);
            domain_error_response(e).into_response()
        }
    }
}
