//! Client for the Google Routes API (`directions/v2:computeRoutes`).
//!
//! Requests are always for driving directions without live traffic, in metric
//! units, and use a field mask so that only duration, distance and the encoded
//! polyline come back.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::coords::Coordinates;
use crate::error::{Result, RouteError, UpstreamService};
use crate::format::{parse_duration_seconds, Language};

/// Response field mask sent as `X-Goog-FieldMask`.
pub const FIELD_MASK: &str = "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline";

/// Travel mode requested for every route.
pub const TRAVEL_MODE: &str = "DRIVE";

/// Routing preference requested for every route.
pub const ROUTING_PREFERENCE: &str = "TRAFFIC_UNAWARE";

/// Unit system requested for every route.
pub const UNITS: &str = "METRIC";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest<'a> {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: &'static str,
    routing_preference: &'static str,
    language_code: &'a str,
    region_code: &'a str,
    units: &'static str,
}

#[derive(Debug, Serialize)]
struct Waypoint {
    location: Location,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinates> for Waypoint {
    fn from(coords: Coordinates) -> Self {
        Waypoint {
            location: Location {
                lat_lng: LatLng {
                    latitude: coords.latitude,
                    longitude: coords.longitude,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Route {
    duration: Option<String>,
    distance_meters: Option<u64>,
    polyline: Option<Polyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Polyline {
    encoded_polyline: Option<String>,
}

/// The first route returned by the Routes API, in raw units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedRoute {
    pub duration_seconds: u64,
    pub distance_meters: u64,
    /// Encoded polyline, empty if the upstream omitted it.
    pub encoded_polyline: String,
}

/// Computes driving routes between coordinate pairs.
#[derive(Clone)]
pub struct RoutesClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    language: Language,
    region: String,
}

impl RoutesClient {
    /// Create a client sharing the given HTTP connection pool.
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.routes_url.clone(),
            api_key: config.api_key.clone(),
            language: config.language,
            region: config.region.clone(),
        }
    }

    /// Request a driving route and return the first one.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingApiKey`] before any request when no key is configured
    /// - [`RouteError::Upstream`] on a non-success HTTP status
    /// - [`RouteError::NoRoute`] when the response holds no routes
    pub async fn compute(
        &self,
        origin: Coordinates,
        destination: Coordinates,
    ) -> Result<ComputedRoute> {
        let api_key = self.api_key.as_deref().ok_or(RouteError::MissingApiKey)?;

        let body = ComputeRoutesRequest {
            origin: origin.into(),
            destination: destination.into(),
            travel_mode: TRAVEL_MODE,
            routing_preference: ROUTING_PREFERENCE,
            language_code: self.language.code(),
            region_code: &self.region,
            units: UNITS,
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(service = "routes", error = %e, "Outbound request failed");
                RouteError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| RouteError::from_body_error(UpstreamService::Routes, e))?;
            tracing::warn!(
                service = "routes",
                status = status.as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                "Upstream returned an error status"
            );
            return Err(RouteError::Upstream {
                service: UpstreamService::Routes,
                status: status.as_u16(),
                body,
            });
        }

        let payload: ComputeRoutesResponse = response
            .json()
            .await
            .map_err(|e| RouteError::from_body_error(UpstreamService::Routes, e))?;

        tracing::debug!(
            service = "routes",
            routes = payload.routes.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Routes response"
        );

        let route = payload.routes.into_iter().next().ok_or(RouteError::NoRoute)?;

        let duration_seconds = match route.duration.as_deref() {
            Some(duration) => parse_duration_seconds(duration)?,
            None => 0,
        };

        Ok(ComputedRoute {
            duration_seconds,
            distance_meters: route.distance_meters.unwrap_or(0),
            encoded_polyline: route
                .polyline
                .and_then(|p| p.encoded_polyline)
                .unwrap_or_default(),
        })
    }
}
