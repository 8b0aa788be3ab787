//! REST API for the trip planner.
//!
//! Provides two endpoints:
//! - `POST /api/plan-trip/` — runs the full planning pipeline and returns
//!   the route, HOS timeline, daily logs, stops, and summary
//! - `GET /api/health/` — liveness check

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::planner::TripPlanner;

pub use types::{ErrorResponse, HealthResponse, PlanTripRequest, ValidationError};

/// Immutable application state shared across all request handlers.
///
/// Constructed once at startup and wrapped in `Arc` — no locks needed, the
/// planner itself holds no mutable state.
pub struct AppState {
    pub planner: TripPlanner,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/plan-trip/", post(handlers::plan_trip))
        .route("/api/health/", get(handlers::health))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
