//! HTTP API Layer
//!
//! REST surface of the venue claim workflow using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: claimant submission and read models, admin review,
//!   decisions, reconciliation, health
//! - **Middleware**: JWT authentication, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: `ClaimError` mapped onto HTTP status codes
//!
//! The router is storage-agnostic: [`AppState`] carries an engine wired to
//! whichever adapters the caller chose.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let state = AppState::new(engine, reconciler, config);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use core_kernel::HealthCheckable;
use domain_claims::{ClaimWorkflowEngine, Reconciler};

use crate::config::ApiConfig;
use crate::handlers::{admin, claims, health, venues};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: ClaimWorkflowEngine,
    pub reconciler: Reconciler,
    pub config: ApiConfig,
    /// Adapters probed by `/health/ready`
    pub health_checks: Vec<Arc<dyn HealthCheckable>>,
}

impl AppState {
    pub fn new(engine: ClaimWorkflowEngine, reconciler: Reconciler, config: ApiConfig) -> Self {
        Self {
            engine,
            reconciler,
            config,
            health_checks: Vec::new(),
        }
    }

    pub fn with_health_check(mut self, check: Arc<dyn HealthCheckable>) -> Self {
        self.health_checks.push(check);
        self
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.submission_body_limit();

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let claimant_routes = Router::new()
        .route(
            "/venues/:id/claims",
            post(claims::submit_claim)
                .get(venues::venue_claims)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/venues/:id/ownership", get(venues::venue_ownership))
        .route("/claims/mine", get(claims::my_claims));

    let admin_routes = Router::new()
        .route("/claims", get(admin::review_queue))
        .route("/claims/:id", get(admin::get_claim))
        .route("/claims/:id/decision", post(admin::decide_claim))
        .route("/claims/:id/documents-request", post(admin::request_documents))
        .route("/reconciliation", get(admin::list_reconciliation))
        .route("/reconciliation/:id/resolve", post(admin::resolve_reconciliation))
        .route("/venues/:id/recount", post(admin::recount_venue));

    // Protected API routes
    let api_routes = Router::new()
        .merge(claimant_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
