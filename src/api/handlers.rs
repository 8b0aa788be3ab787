//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{ErrorResponse, HealthResponse, PlanTripRequest};
use crate::planner::TripPlannerError;

/// Runs the trip-planning pipeline for the given request.
///
/// `POST /api/plan-trip/` → 200 + `PlanTripResponse` JSON on success,
/// 400 + `ErrorResponse` for a request that fails validation before the
/// orchestrator runs, 422 + `ErrorResponse` for a collaborator or simulator
/// failure, 500 + `ErrorResponse` if the simulator hits an internal
/// invariant violation.
pub async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PlanTripRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        tracing::warn!(error = %e.0, "rejected invalid plan-trip request");
        return Err((StatusCode::BAD_REQUEST, Json(ErrorResponse { error: e.0 })));
    }

    let result = state
        .planner
        .plan_trip(
            &request.current_location,
            &request.pickup_location,
            &request.dropoff_location,
            request.cycle_used_hours,
        )
        .await;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            let status = if err.is_internal_bug() {
                tracing::error!(error = %err, "internal error planning trip");
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                tracing::warn!(error = %err, "trip planning failed");
                StatusCode::UNPROCESSABLE_ENTITY
            };
            Err((
                status,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            ))
        }
    }
}

/// Liveness check.
///
/// `GET /api/health/` → 200 + `HealthResponse`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
