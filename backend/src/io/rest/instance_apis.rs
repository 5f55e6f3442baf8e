//! # REST API for Chore Instances
//!
//! Endpoints for listing generated chore instances, toggling their
//! completion, and reviewing completion history.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};

use crate::io::rest::domain_error_response;
use crate::AppState;
use shared::{
    CompletedFilter, DeleteInstanceRequest, DeleteResponse, InstanceAction, InstanceActionRequest,
};

// Query parameters for instance listing API
#[derive(Debug, Deserialize)]
pub struct InstanceListQuery {
    pub date: Option<NaiveDate>,
    pub due: Option<bool>,
}

// Query parameters for completion history API
#[derive(Debug, Deserialize)]
pub struct CompletedHistoryQuery {
    pub filter: Option<CompletedFilter>,
}

/// List chore instances.
///
/// With `?date=` only open instances due on that day are returned, with
/// `?due=true` everything open up to today. Without either, the full list.
pub async fn list_instances(
    State(state): State<AppState>,
    Query(query): Query<InstanceListQuery>,
) -> impl IntoResponse {
    info!("GET /api/instances - query: {:?}", query);

    let result = if let Some(date) = query.date {
        state.instance_service.chores_for_date(date).await
    } else if query.due.unwrap_or(false) {
        state.instance_service.due_chores().await
    } else {
        state.instance_service.list_instances().await
    };

    match result {
        Ok(instances) => (StatusCode::OK, Json(instances)).into_response(),
        Err(e) => {
            error!("Failed to list instances: {}", e);
            domain_error_response(e).into_response()
        }
    }
}

/// Toggle a chore instance between complete and not complete
pub async fn update_instance(
    State(state): State<AppState>,
    Json(request): Json<InstanceActionRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/instances - request: {:?}", request);

    let result = match request.action {
        InstanceAction::Complete => state.instance_service.complete_chore(&request.id).await,
        InstanceAction::Uncomplete => state.instance_service.uncomplete_chore(&request.id).await,
    };

    match result {
        Ok(instance) => (StatusCode::OK, Json(instance)).into_response(),
        Err(e) => {
            error!("Failed to update instance {}: {}", request.id, e);
            domain_error_response(e).into_response()
        }
    }
}

/// Delete a single chore instance
pub async fn delete_instance(
    State(state): State<AppState>,
    Json(request): Json<DeleteInstanceRequest>,
) -> impl IntoResponse {
    info!("DELETE /api/instances - request: {:?}", request);

    match state.instance_service.delete_chore_instance(&request.id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse { success: true })).into_response(),
        Err(e) => {
            error!("Failed to delete instance {}: {}", request.id, e);
            domain_error_response(e).into_response()
        }
    }
}

/// List completed chores, most recent first, optionally windowed
pub async fn list_completed_chores(
    State(state): State<AppState>,
    Query(query): Query<CompletedHistoryQuery>,
) -> impl IntoResponse {
    info!("GET /api/instances/completed - query: {:?}", query);

    let filter = query.filter.unwrap_or_default();

    match state.instance_service.completed_history(filter).await {
        Ok(instances) => (StatusCode::OK, Json(instances)).into_response(),
        Err(e) => {
            error!("Failed to list completed chores: {}", e);
            domain_error_response(e).into_response()
        }
    }
}
