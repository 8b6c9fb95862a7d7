//! Process configuration, read once at startup.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GCP_API_KEY` | Server-side Google Maps Platform key | None |
//! | `FRONTEND_ORIGIN` | Allowed CORS origin | `http://localhost:3000` |
//! | `MAPS_BROWSER_KEY` | Scoped key handed to the frontend map widget | None |
//! | `DRIVEROUTE_EXPOSE_MAPS_KEY` | Hand out `GCP_API_KEY` when no browser key is set | true |
//! | `DRIVEROUTE_LANGUAGE` | `ja` or `en` | `ja` |
//! | `DRIVEROUTE_REGION` | Region code sent upstream | `JP` |
//! | `DRIVEROUTE_UPSTREAM_TIMEOUT_SECS` | Timeout for each outbound call | 10 |
//! | `DRIVEROUTE_GEOCODING_URL` | Geocoding endpoint | Google |
//! | `DRIVEROUTE_ROUTES_URL` | Routes endpoint | Google |

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;

use crate::error::{Result, RouteError};
use crate::format::Language;

/// Google Geocoding API endpoint.
pub const DEFAULT_GEOCODING_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Google Routes API `computeRoutes` endpoint.
pub const DEFAULT_ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Origin allowed by CORS when `FRONTEND_ORIGIN` is unset.
pub const DEFAULT_FRONTEND_ORIGIN: &str = "http://localhost:3000";

/// Default region code.
pub const DEFAULT_REGION: &str = "JP";

/// Default timeout for outbound requests in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration shared by the geocoding and routing clients.
#[derive(Clone)]
pub struct Config {
    /// Server-side API key. Requests fail with [`RouteError::MissingApiKey`] when `None`.
    pub api_key: Option<String>,
    /// Browser-restricted key for the frontend map widget.
    pub maps_browser_key: Option<String>,
    /// Whether `api_key` may be handed to the frontend when no browser key is set.
    pub expose_maps_key: bool,
    /// Origin allowed to call the HTTP API from a browser.
    pub frontend_origin: String,
    pub language: Language,
    pub region: String,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    pub geocoding_url: String,
    pub routes_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            maps_browser_key: None,
            expose_maps_key: true,
            frontend_origin: DEFAULT_FRONTEND_ORIGIN.to_string(),
            language: Language::default(),
            region: DEFAULT_REGION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            routes_url: DEFAULT_ROUTES_URL.to_string(),
        }
    }
}

// Keys never reach logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field(
                "maps_browser_key",
                &self.maps_browser_key.as_ref().map(|_| "<redacted>"),
            )
            .field("expose_maps_key", &self.expose_maps_key)
            .field("frontend_origin", &self.frontend_origin)
            .field("language", &self.language)
            .field("region", &self.region)
            .field("timeout", &self.timeout)
            .field("geocoding_url", &self.geocoding_url)
            .field("routes_url", &self.routes_url)
            .finish()
    }
}

impl Config {
    /// Create a configuration with the given server-side API key and defaults elsewhere.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Read the configuration from process environment variables.
    ///
    /// Unset variables fall back to their defaults. An empty `GCP_API_KEY`
    /// counts as unset.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Config`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let language = match non_empty("DRIVEROUTE_LANGUAGE") {
            Some(value) => value.parse()?,
            None => defaults.language,
        };

        let timeout = match non_empty("DRIVEROUTE_UPSTREAM_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| {
                    RouteError::Config(format!(
                        "DRIVEROUTE_UPSTREAM_TIMEOUT_SECS must be a positive integer, got '{}'",
                        value
                    ))
                })?;
                if secs == 0 {
                    return Err(RouteError::Config(
                        "DRIVEROUTE_UPSTREAM_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        let expose_maps_key = match non_empty("DRIVEROUTE_EXPOSE_MAPS_KEY") {
            Some(value) => parse_bool("DRIVEROUTE_EXPOSE_MAPS_KEY", &value)?,
            None => defaults.expose_maps_key,
        };

        let frontend_origin = non_empty("FRONTEND_ORIGIN").unwrap_or(defaults.frontend_origin);
        if HeaderValue::from_str(&frontend_origin).is_err() {
            return Err(RouteError::Config(format!(
                "FRONTEND_ORIGIN is not a valid header value: '{}'",
                frontend_origin
            )));
        }

        Ok(Self {
            api_key: non_empty("GCP_API_KEY"),
            maps_browser_key: non_empty("MAPS_BROWSER_KEY"),
            expose_maps_key,
            frontend_origin,
            language,
            region: non_empty("DRIVEROUTE_REGION").unwrap_or(defaults.region),
            timeout,
            geocoding_url: non_empty("DRIVEROUTE_GEOCODING_URL").unwrap_or(defaults.geocoding_url),
            routes_url: non_empty("DRIVEROUTE_ROUTES_URL").unwrap_or(defaults.routes_url),
        })
    }

    /// The server-side API key, or [`RouteError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(RouteError::MissingApiKey)
    }

    /// Key handed to the frontend map widget, if any.
    ///
    /// A dedicated browser key wins. The server key is only returned while
    /// `expose_maps_key` is enabled.
    pub fn maps_key_for_client(&self) -> Option<&str> {
        match &self.maps_browser_key {
            Some(key) => Some(key.as_str()),
            None if self.expose_maps_key => self.api_key.as_deref(),
            None => None,
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RouteError::Config(format!(
            "{} must be a boolean, got '{}'",
            name, value
        ))),
    }
}
