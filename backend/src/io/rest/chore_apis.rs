//! # REST API for Chore Templates
//!
//! Endpoints for creating, listing, updating, and deleting chore templates,
//! and for extending a template's generated instance series.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::io::rest::domain_error_response;
use crate::AppState;
use shared::{
    CreateChoreRequest, DeleteResponse, GenerateInstancesRequest, GenerateInstancesResponse,
    UpdateChoreRequest,
};

/// List all active chore templates
pub async fn list_chores(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/chores");

    match state.template_service.list_chores().await {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(e) => {
            error!("Failed to list chores: {}", e);
            domain_error_response(e).into_response()
        }
    }
}

/// Create a new chore template and its initial batch of instances
pub async fn create_chore(
    State(state): State<AppState>,
    Json(request): Json<CreateChoreRequest>,
) -> impl IntoResponse {
    info!("POST /api/chores - request: {:?}", request);

    match state.template_service.create_chore(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Failed to create chore: {}", e);
            domain_error_response(e).into_response()
        }
    }
}

/// Update a chore template's amount or active flag
pub async fn update_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateChoreRequest>,
) -> impl IntoResponse {
    info!("PATCH /api/chores/{} - request: {:?}", id, request);

    match state.template_service.update_chore(&id, request).await {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(e) => {
            error!("Failed to update chore {}: {}", id, e);
            domain_error_response(e).into_response()
        }
    }
}

/// Delete a chore template and all of its instances
pub async fn delete_chore(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/chores/{}", id);

    match state.template_service.delete_chore(&id).await {
        Ok(()) => (StatusCode::OK, Json(DeleteResponse { success: true })).into_response(),
        Err(e) => {
            error!("Failed to delete chore {}: {}", id, e);
            domain_error_response(e).into_response()
        }
    }
}

/// Generate further instances for an existing chore template
pub async fn generate_instances(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<GenerateInstancesRequest>,
) -> impl IntoResponse {
    info!("POST /api/chores/{}/generate - request: {:?}", id, request);

    match state.template_service.generate_instances(&id, request).await {
        Ok(count) => {
            let response = GenerateInstancesResponse {
                instances_created: count,
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to generate instances for chore {}: {}", id, e);
            domain_error_response(e).into_response()
        }
    }
}
