//! # REST API for the Schedule Overview

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::domain_error_response;
use crate::AppState;

/// Active templates grouped by frequency, with per-template progress
pub async fn get_schedule(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/schedule");

    match state.schedule_service.schedule_summary().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to build schedule summary: {}", e);
            domain_error_response(e).into_response()
        }
    }
}
