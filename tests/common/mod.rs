//! Shared test fixtures for integration tests: deterministic fake
//! collaborators so no test makes a live network call.

use async_trait::async_trait;
use eld_trip_planner::planner::{Geocoder, GeocodingError, RouteLeg, Router, RoutingError};

/// Geocodes a small fixed set of known cities; anything else is "not found".
pub struct FixtureGeocoder;

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodingError> {
        match address {
            "Chicago, IL" => Ok((41.8781, -87.6298)),
            "Indianapolis, IN" => Ok((39.7684, -86.1581)),
            "Columbus, OH" => Ok((39.9612, -82.9988)),
            "Denver, CO" => Ok((39.7392, -104.9903)),
            "Cheyenne, WY" => Ok((41.1400, -104.8202)),
            other => Err(GeocodingError::NotFound(other.to_string())),
        }
    }
}

/// Returns a fixed distance/duration per leg, independent of the coordinates
/// given — good enough to exercise the orchestrator end to end.
pub struct FixtureRouter {
    pub distance_miles: f64,
    pub duration_minutes: f64,
}

impl FixtureRouter {
    pub fn new(distance_miles: f64, duration_minutes: f64) -> Self {
        Self {
            distance_miles,
            duration_minutes,
        }
    }
}

#[async_trait]
impl Router for FixtureRouter {
    async fn route(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<RouteLeg, RoutingError> {
        Ok(RouteLeg {
            distance_miles: self.distance_miles,
            duration_minutes: self.duration_minutes,
            geometry: vec![[origin.0, origin.1], [destination.0, destination.1]],
        })
    }
}

/// A router that always fails, for exercising error propagation.
pub struct FailingRouter;

#[async_trait]
impl Router for FailingRouter {
    async fn route(
        &self,
        _origin: (f64, f64),
        _destination: (f64, f64),
    ) -> Result<RouteLeg, RoutingError> {
        Err(RoutingError::NoRoute)
    }
}
