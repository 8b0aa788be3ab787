//! Routing collaborator: calculates driving distance, duration, and road
//! geometry between two coordinate pairs via OpenRouteService (ORS).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{RouteLeg, RoutingError};

const ORS_DIRECTIONS_URL: &str = "https://api.openrouteservice.org/v2/directions/driving-hgv";
const METERS_TO_MILES: f64 = 0.000_621_371;

/// Computes a driving route between two `(lat, lng)` points.
///
/// A trait object so the orchestrator and its tests can swap in a
/// deterministic fake without performing network I/O.
#[async_trait]
pub trait Router: Send + Sync {
    async fn route(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<RouteLeg, RoutingError>;
}

#[derive(Serialize)]
struct OrsRequestBody {
    coordinates: [[f64; 2]; 2],
}

#[derive(Debug, Deserialize)]
struct OrsResponse {
    routes: Vec<OrsRoute>,
}

#[derive(Debug, Deserialize)]
struct OrsRoute {
    summary: OrsSummary,
    geometry: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrsSummary {
    distance: f64,
    duration: f64,
}

/// OpenRouteService-backed [`Router`]. Requires an API key; see
/// [`crate::config::AppConfig::ors_api_key`].
pub struct OpenRouteServiceRouter {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl OpenRouteServiceRouter {
    /// Builds a router using `api_key` for every request. `None` causes
    /// every call to fail with [`RoutingError::Unauthorized`] without
    /// making a network request.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Router for OpenRouteServiceRouter {
    async fn route(
        &self,
        origin: (f64, f64),
        destination: (f64, f64),
    ) -> Result<RouteLeg, RoutingError> {
        let api_key = self.api_key.as_deref().ok_or(RoutingError::Unauthorized)?;

        // ORS expects coordinates as [longitude, latitude].
        let body = OrsRequestBody {
            coordinates: [[origin.1, origin.0], [destination.1, destination.0]],
        };

        let response = self
            .client
            .post(ORS_DIRECTIONS_URL)
            .header("Authorization", api_key)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Accept", "application/json, application/geo+json")
            .json(&body)
            .send()
            .await
            .map_err(|e| RoutingError::Provider(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(RoutingError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::Quota);
        }
        if !status.is_success() {
            return Err(RoutingError::Provider(format!("status {status}")));
        }

        let data: OrsResponse = response
            .json()
            .await
            .map_err(|e| RoutingError::Provider(e.to_string()))?;

        let leg = build_route_leg(data)?;
        tracing::info!(
            distance_miles = leg.distance_miles,
            duration_minutes = leg.duration_minutes,
            geometry_points = leg.geometry.len(),
            "route calculated"
        );
        Ok(leg)
    }
}

/// Extracts a [`RouteLeg`] from the decoded ORS response, separated out so
/// it can be unit-tested without network I/O.
fn build_route_leg(data: OrsResponse) -> Result<RouteLeg, RoutingError> {
    let route = data.routes.into_iter().next().ok_or(RoutingError::NoRoute)?;

    let distance_miles = round1(route.summary.distance * METERS_TO_MILES);
    let duration_minutes = round1(route.summary.duration / 60.0);
    let geometry = route
        .geometry
        .map(|g| decode_polyline(&g))
        .unwrap_or_default();

    Ok(RouteLeg {
        distance_miles,
        duration_minutes,
        geometry,
    })
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Decodes a Google-encoded polyline string (precision 5, ORS's default
/// encoding) into `[lat, lng]` pairs.
pub fn decode_polyline(encoded: &str) -> Vec<[f64; 2]> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut index = 0usize;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while index < bytes.len() {
        let (dlat, next) = decode_value(bytes, index);
        index = next;
        lat += dlat;

        let (dlng, next) = decode_value(bytes, index);
        index = next;
        lng += dlng;

        points.push([lat as f64 / 1e5, lng as f64 / 1e5]);
    }

    points
}

/// Decodes one variable-length, zigzag-encoded signed value starting at
/// `index`. Returns the decoded delta and the index just past it.
fn decode_value(bytes: &[u8], mut index: usize) -> (i64, usize) {
    let mut shift = 0;
    let mut result: i64 = 0;

    loop {
        let byte = bytes[index] as i64 - 63;
        index += 1;
        result |= (byte & 0x1f) << shift;
        shift += 5;
        if byte < 0x20 {
            break;
        }
    }

    let delta = if result & 1 != 0 { !(result >> 1) } else { result >> 1 };
    (delta, index)
}
