//! Geocoding collaborator: resolves a human-readable address into
//! coordinates via the Nominatim (OpenStreetMap) search API.

use async_trait::async_trait;
use serde::Deserialize;

use super::ratelimit::RateLimiter;
use super::types::GeocodingError;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Converts an address string into `(latitude, longitude)`.
///
/// A trait object so the orchestrator and its tests can swap in a
/// deterministic fake without performing network I/O.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodingError>;
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

/// Nominatim-backed [`Geocoder`]. No API key required, but Nominatim's usage
/// policy requires a descriptive `User-Agent` and caps requests at
/// 1/second — both are enforced here rather than left to the caller.
pub struct NominatimGeocoder {
    client: reqwest::Client,
    user_agent: String,
    limiter: RateLimiter,
}

impl NominatimGeocoder {
    /// Builds a geocoder sending `user_agent` with every request and
    /// throttled to `requests_per_sec`.
    pub fn new(user_agent: String, requests_per_sec: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent,
            limiter: RateLimiter::new(requests_per_sec),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<(f64, f64), GeocodingError> {
        self.limiter.acquire().await;

        let response = self
            .client
            .get(NOMINATIM_URL)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| GeocodingError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeocodingError::Provider(format!(
                "status {}",
                response.status()
            )));
        }

        let results: Vec<NominatimResult> = response
            .json()
            .await
            .map_err(|e| GeocodingError::Provider(e.to_string()))?;

        let coords = parse_first_result(results, address)?;
        tracing::info!(address, lat = coords.0, lng = coords.1, "geocoded address");
        Ok(coords)
    }
}

/// Extracts `(lat, lng)` from the first Nominatim result, separated out of
/// [`NominatimGeocoder::geocode`] so it can be unit-tested without network
/// I/O.
fn parse_first_result(
    results: Vec<NominatimResult>,
    address: &str,
) -> Result<(f64, f64), GeocodingError> {
    let first = results
        .into_iter()
        .next()
        .ok_or_else(|| GeocodingError::NotFound(address.to_string()))?;

    let lat: f64 = first
        .lat
        .parse()
        .map_err(|_| GeocodingError::Provider("invalid latitude in response".to_string()))?;
    let lng: f64 = first
        .lon
        .parse()
        .map_err(|_| GeocodingError::Provider("invalid longitude in response".to_string()))?;

    Ok((lat, lng))
}
