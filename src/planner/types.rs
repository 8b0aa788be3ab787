//! Error hierarchy and public response DTOs for the trip-planning pipeline.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use crate::hos::{SimulatorError, TimelineEvent};
use crate::log_builder::DailyLog;

/// Raised when an address cannot be resolved to coordinates.
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// The geocoder returned zero results for the given address.
    #[error("could not find location: '{0}'. Please try a more specific address.")]
    NotFound(String),
    /// The geocoder's HTTP call failed, or its response could not be parsed.
    #[error("geocoding service error: {0}")]
    Provider(String),
}

/// Raised when a route cannot be calculated between two points.
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The router found no route between the given coordinates.
    #[error("no route found between the given locations. Please check your addresses.")]
    NoRoute,
    /// The router rejected the request for lack of (or an invalid) API key.
    #[error("invalid routing API key or unauthorized")]
    Unauthorized,
    /// The router's usage quota has been exceeded.
    #[error("routing service quota exceeded")]
    Quota,
    /// Any other HTTP or parsing failure.
    #[error("routing service error: {0}")]
    Provider(String),
}

/// A single leg's raw routing result, internal to the planner — not the
/// wire-format [`RouteLegResponse`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub distance_miles: f64,
    pub duration_minutes: f64,
    pub geometry: Vec<[f64; 2]>,
}

/// Top-level pipeline failure wrapping any collaborator or simulator error.
#[derive(Debug, Error)]
pub enum TripPlannerError {
    #[error("{0}")]
    Geocoding(#[from] GeocodingError),
    #[error("{0}")]
    Routing(#[from] RoutingError),
    #[error("{0}")]
    Simulator(#[from] SimulatorError),
}

impl TripPlannerError {
    /// Whether this failure is an internal invariant violation that should
    /// be reported as a 500 rather than a 422.
    pub fn is_internal_bug(&self) -> bool {
        matches!(self, Self::Simulator(SimulatorError::Bug(_)))
    }
}

/// One leg of the route as returned to the HTTP client.
#[derive(Debug, Clone, Serialize)]
pub struct RouteLegResponse {
    pub from: String,
    pub to: String,
    pub distance_miles: f64,
    pub duration_hours: f64,
    pub geometry: Vec<[f64; 2]>,
}

/// Both legs plus trip-wide route totals.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub legs: Vec<RouteLegResponse>,
    pub total_distance_miles: f64,
    pub total_duration_hours: f64,
}

/// A non-driving event surfaced as a map marker, classified by its explicit
/// [`crate::hos::StopKind`] rather than inferred from its note string.
#[derive(Debug, Clone, Serialize)]
pub struct StopMarker {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub location: String,
    pub lat: f64,
    pub lng: f64,
    pub start_time: NaiveDateTime,
    pub duration_mins: i64,
    pub note: String,
}

/// Trip-wide totals shown alongside the timeline and daily logs.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total_days: usize,
    pub total_driving_miles: f64,
    pub cycle_hours_at_start: f64,
    pub cycle_hours_at_end: f64,
}

/// The full `POST /api/plan-trip/` response body.
#[derive(Debug, Clone, Serialize)]
pub struct PlanTripResponse {
    pub route: RouteSummary,
    pub timeline: Vec<TimelineEvent>,
    pub daily_logs: Vec<DailyLog>,
    pub stops: Vec<StopMarker>,
    pub summary: Summary,
}
