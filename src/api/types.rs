//! Request/response types for the HTTP API.

use serde::{Deserialize, Serialize};

/// `POST /api/plan-trip/` request body.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanTripRequest {
    pub current_location: String,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub cycle_used_hours: f64,
}

/// Maximum accepted length for a location string.
const MAX_LOCATION_LEN: usize = 200;
/// Maximum accepted `cycle_used_hours` value (inclusive).
const MAX_CYCLE_USED_HOURS: f64 = 69.0;

/// A request failed validation before the orchestrator ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(pub String);

impl PlanTripRequest {
    /// Validates the request body before the orchestrator runs.
    ///
    /// # Errors
    ///
    /// Returns the first offending field's [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("current_location", &self.current_location),
            ("pickup_location", &self.pickup_location),
            ("dropoff_location", &self.dropoff_location),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError(format!("{name} must not be empty")));
            }
            if value.chars().count() > MAX_LOCATION_LEN {
                return Err(ValidationError(format!(
                    "{name} must be at most {MAX_LOCATION_LEN} characters"
                )));
            }
        }

        if !(0.0..=MAX_CYCLE_USED_HOURS).contains(&self.cycle_used_hours) {
            return Err(ValidationError(format!(
                "cycle_used_hours must be in [0, {MAX_CYCLE_USED_HOURS}], got {}",
                self.cycle_used_hours
            )));
        }

        Ok(())
    }
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /api/health/` response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
