//! Route lookup service tying the geocoding and routing clients together.
//!
//! ```ignore
//! use driveroute::{Config, RouteService};
//!
//! let service = RouteService::builder(Config::from_env()?).build()?;
//!
//! let summary = service.compute_route("東京駅", "大阪駅").await?;
//! println!("{} / {}", summary.distance, summary.duration);
//! ```

use std::time::Duration;

use reqwest::Client;

use crate::config::Config;
use crate::coords::{GeocodeResult, RouteSummary};
use crate::error::{Result, RouteError};
use crate::format::{format_distance, format_duration, Language};
use crate::geocode::GeocodingClient;
use crate::routes::RoutesClient;

/// High-level geocoding and driving-route service.
///
/// Holds no per-request state; a single instance is shared by all requests.
#[derive(Clone)]
pub struct RouteService {
    config: Config,
    geocoder: GeocodingClient,
    routes: RoutesClient,
}

impl RouteService {
    /// Create a service from configuration with a default HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: Config) -> Result<Self> {
        RouteServiceBuilder::new(config).build()
    }

    /// Create a builder for customizing the service.
    pub fn builder(config: Config) -> RouteServiceBuilder {
        RouteServiceBuilder::new(config)
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether a server-side API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Key handed to the frontend map widget, if any.
    pub fn maps_api_key(&self) -> Option<&str> {
        self.config.maps_key_for_client()
    }

    /// Resolve a free-text address to a formatted address and coordinates.
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        self.geocoder.geocode(address).await
    }

    /// Geocode both addresses and compute a driving route between them.
    ///
    /// The two geocoding lookups run concurrently. If either fails, its error
    /// is returned and the routing service is not called.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingApiKey`] before any request when no key is configured
    /// - any geocoding error for either address
    /// - [`RouteError::Upstream`] / [`RouteError::NoRoute`] from the routing call
    pub async fn compute_route(&self, origin: &str, destination: &str) -> Result<RouteSummary> {
        self.config.require_api_key()?;

        let (origin_geo, destination_geo) =
            tokio::try_join!(self.geocode(origin), self.geocode(destination))?;

        tracing::debug!(
            origin = %origin_geo.address,
            destination = %destination_geo.address,
            "Addresses resolved"
        );

        let route = self
            .routes
            .compute(origin_geo.coordinates, destination_geo.coordinates)
            .await?;

        Ok(RouteSummary {
            distance: format_distance(route.distance_meters),
            duration: format_duration(route.duration_seconds, self.config.language),
            polyline: route.encoded_polyline,
            origin_coords: origin_geo.coordinates,
            destination_coords: destination_geo.coordinates,
        })
    }
}

/// Builder for [`RouteService`].
pub struct RouteServiceBuilder {
    config: Config,
    client: Option<Client>,
}

impl RouteServiceBuilder {
    /// Create a new builder from a configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// See [`Config::from_env`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Config::from_env()?))
    }

    /// Set the server-side API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Override the Geocoding and Routes endpoints.
    pub fn endpoints(mut self, geocoding_url: impl Into<String>, routes_url: impl Into<String>) -> Self {
        self.config.geocoding_url = geocoding_url.into();
        self.config.routes_url = routes_url.into();
        self
    }

    /// Set the language used upstream and for duration formatting.
    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    /// Set the timeout for each outbound request.
    ///
    /// Ignored when a client is supplied through [`http_client`](Self::http_client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Use an existing HTTP client instead of building one.
    pub fn http_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the [`RouteService`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created (e.g. TLS
    /// initialization failure).
    pub fn build(self) -> Result<RouteService> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.config.timeout)
                .build()
                .map_err(|e| RouteError::Config(format!("Failed to create HTTP client: {}", e)))?,
        };

        Ok(RouteService {
            geocoder: GeocodingClient::new(client.clone(), &self.config),
            routes: RoutesClient::new(client, &self.config),
            config: self.config,
        })
    }
}
