//! Environment-driven application configuration.
//!
//! There is no scenario file format in this service — every external
//! collaborator call is parameterized by a handful of values read directly
//! from the process environment, so a TOML layer would add a format with
//! nothing to put in it.

use std::fmt;
use std::net::SocketAddr;

/// Default HTTP bind address.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default `User-Agent` sent to the Nominatim geocoding service.
const DEFAULT_GEOCODER_USER_AGENT: &str = "eld-trip-planner/0.1 (contact: ops@example.com)";

/// Default geocoder rate limit, requests per second.
const DEFAULT_GEOCODER_RATE_LIMIT: u32 = 1;

/// Application configuration, loaded once at startup from environment
/// variables with documented defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server bind address. Overridable via `ELD_BIND_ADDR`.
    pub bind_addr: SocketAddr,
    /// `User-Agent` header sent with every Nominatim request, required by
    /// its usage policy. Overridable via `ELD_GEOCODER_USER_AGENT`.
    pub geocoder_user_agent: String,
    /// OpenRouteService API key, read from `OPENROUTESERVICE_API_KEY`.
    /// Routing fails with `RoutingError::Unauthorized` if absent when a real
    /// route is requested.
    pub ors_api_key: Option<String>,
    /// Maximum geocoder requests per second. Overridable via
    /// `ELD_GEOCODER_RATE_LIMIT`; must be >= 1.
    pub geocoder_rate_limit_per_sec: u32,
}

/// Configuration error naming the offending variable and the violated
/// constraint.
#[derive(Debug)]
pub struct ConfigError {
    /// Environment variable name.
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Loads configuration from the process environment, falling back to
    /// documented defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if a set variable fails to parse or violates
    /// a constraint (e.g. `ELD_BIND_ADDR` is not a valid socket address, or
    /// `ELD_GEOCODER_RATE_LIMIT` is `0`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = match std::env::var("ELD_BIND_ADDR") {
            Ok(raw) => raw.parse().map_err(|e| ConfigError {
                field: "ELD_BIND_ADDR".to_string(),
                message: format!("\"{raw}\" is not a valid socket address: {e}"),
            })?,
            Err(_) => DEFAULT_BIND_ADDR
                .parse()
                .expect("default bind address is always valid"),
        };

        let geocoder_user_agent = std::env::var("ELD_GEOCODER_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_USER_AGENT.to_string());

        let ors_api_key = std::env::var("OPENROUTESERVICE_API_KEY").ok();

        let geocoder_rate_limit_per_sec = match std::env::var("ELD_GEOCODER_RATE_LIMIT") {
            Ok(raw) => {
                let parsed: u32 = raw.parse().map_err(|e| ConfigError {
                    field: "ELD_GEOCODER_RATE_LIMIT".to_string(),
                    message: format!("\"{raw}\" is not a valid u32: {e}"),
                })?;
                if parsed == 0 {
                    return Err(ConfigError {
                        field: "ELD_GEOCODER_RATE_LIMIT".to_string(),
                        message: "must be >= 1".to_string(),
                    });
                }
                parsed
            }
            Err(_) => DEFAULT_GEOCODER_RATE_LIMIT,
        };

        Ok(Self {
            bind_addr,
            geocoder_user_agent,
            ors_api_key,
            geocoder_rate_limit_per_sec,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .expect("default bind address is always valid"),
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
            ors_api_key: None,
            geocoder_rate_limit_per_sec: DEFAULT_GEOCODER_RATE_LIMIT,
        }
    }
}
