//! # Chore Tracker Backend
//!
//! Contains all non-UI logic for the chore tracker application.
//!
//! This crate serves as the orchestration layer that brings together:
//! - **Domain**: Business logic and rules for chores, earnings, and payouts
//! - **Storage**: Data persistence mechanisms (SQLite database)
//! - **IO**: Interface layer that exposes functionality over HTTP
//!
//! The backend is designed to be UI-agnostic, meaning it could support
//! different frontend frameworks or even CLI interfaces without modification.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (Business logic, services)
//!     ↓
//! Storage Layer (Database, persistence)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Initialize and configure the application state
//! - Set up the REST API router with proper CORS configuration
//! - Coordinate between domain logic and data persistence
//! - Provide a clean separation of concerns for maintainability

pub mod domain;
pub mod io;
pub mod storage;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use anyhow::Result;
use tracing::info;

use crate::domain::{
    EarningsService, InstanceService, PayoutService, ScheduleService, TemplateService,
};
use crate::storage::DbConnection;

pub use domain::*;
pub use io::*;
pub use storage::*;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub template_service: TemplateService,
    pub instance_service: InstanceService,
    pub earnings_service: EarningsService,
    pub payout_service: PayoutService,
    pub schedule_service: ScheduleService,
}

/// Build the application state from an initialized database connection
pub fn build_app_state(db: DbConnection) -> AppState {
    AppState {
        template_service: TemplateService::new(db.clone()),
        instance_service: InstanceService::new(db.clone()),
        earnings_service: EarningsService::new(db.clone()),
        payout_service: PayoutService::new(db.clone()),
        schedule_service: ScheduleService::new(db),
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db_conn = DbConnection::init().await?;

    info!("Setting up application state");
    Ok(build_app_state(db_conn))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/chores", get(io::list_chores).post(io::create_chore))
        .route("/chores/:id", patch(io::update_chore).delete(io::delete_chore))
        .route("/chores/:id/generate", post(io::generate_instances))
        .route(
            "/instances",
            get(io::list_instances)
                .patch(io::update_instance)
                .delete(io::delete_instance),
        )
        .route("/instances/completed", get(io::list_completed_chores))
        .route("/payouts", get(io::list_payouts).post(io::create_payout))
        .route("/earnings", get(io::get_total_earned))
        .route("/schedule", get(io::get_schedule));

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
