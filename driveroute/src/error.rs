//! Error types for the driveroute library.

use std::fmt;
use thiserror::Error;

/// The external service an upstream failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    /// Google Geocoding API.
    Geocoding,
    /// Google Routes API (`computeRoutes`).
    Routes,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamService::Geocoding => f.write_str("Geocoding"),
            UpstreamService::Routes => f.write_str("Routes"),
        }
    }
}

/// Errors that can occur while geocoding addresses or computing routes.
#[derive(Error, Debug)]
pub enum RouteError {
    /// The server-side API key is not configured.
    #[error("GCP_API_KEY is not configured")]
    MissingApiKey,

    /// An upstream service answered with a non-success HTTP status.
    #[error("{service} API error: {body}")]
    Upstream {
        service: UpstreamService,
        status: u16,
        body: String,
    },

    /// The geocoder ran but could not resolve the address (e.g. `ZERO_RESULTS`).
    #[error(
        "Geocoding failed: {status} - {}",
        .message.as_deref().unwrap_or("Unknown error")
    )]
    Resolution {
        status: String,
        message: Option<String>,
    },

    /// The routing service returned no routes.
    #[error("No route found between the specified locations")]
    NoRoute,

    /// Caller supplied input that cannot be sent upstream.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Connection failure or timeout talking to an upstream service.
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// An upstream payload could not be interpreted.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl RouteError {
    /// Classify a failure while reading an upstream response body.
    pub(crate) fn from_body_error(service: UpstreamService, err: reqwest::Error) -> Self {
        if err.is_decode() {
            RouteError::InvalidResponse(format!("{} payload: {}", service, err))
        } else {
            RouteError::Request(err)
        }
    }
}

/// Result type alias using [`RouteError`].
pub type Result<T> = std::result::Result<T, RouteError>;
