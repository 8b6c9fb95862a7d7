//! Client for the Google Geocoding API.

use std::time::Instant;

use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::coords::{Coordinates, GeocodeResult};
use crate::error::{Result, RouteError, UpstreamService};
use crate::format::Language;

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<Candidate>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Resolves free-text addresses to coordinates.
#[derive(Clone)]
pub struct GeocodingClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    language: Language,
    region: String,
}

impl GeocodingClient {
    /// Create a client sharing the given HTTP connection pool.
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.geocoding_url.clone(),
            api_key: config.api_key.clone(),
            language: config.language,
            region: config.region.clone(),
        }
    }

    /// Geocode an address, returning the first candidate.
    ///
    /// # Errors
    ///
    /// - [`RouteError::MissingApiKey`] before any request when no key is configured
    /// - [`RouteError::InvalidInput`] for a blank address
    /// - [`RouteError::Upstream`] on a non-success HTTP status
    /// - [`RouteError::Resolution`] when the payload status is not `OK`
    pub async fn geocode(&self, address: &str) -> Result<GeocodeResult> {
        let api_key = self.api_key.as_deref().ok_or(RouteError::MissingApiKey)?;

        if address.trim().is_empty() {
            return Err(RouteError::InvalidInput(
                "address must not be empty".to_string(),
            ));
        }

        let started = Instant::now();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("address", address),
                ("key", api_key),
                ("language", self.language.code()),
                ("region", self.region.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(service = "geocoding", error = %e, "Outbound request failed");
                RouteError::Request(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| RouteError::from_body_error(UpstreamService::Geocoding, e))?;
            tracing::warn!(
                service = "geocoding",
                status = status.as_u16(),
                latency_ms = started.elapsed().as_millis() as u64,
                "Upstream returned an error status"
            );
            return Err(RouteError::Upstream {
                service: UpstreamService::Geocoding,
                status: status.as_u16(),
                body,
            });
        }

        let payload: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| RouteError::from_body_error(UpstreamService::Geocoding, e))?;

        tracing::debug!(
            service = "geocoding",
            status = %payload.status,
            candidates = payload.results.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "Geocoding response"
        );

        if payload.status != "OK" {
            return Err(RouteError::Resolution {
                status: payload.status,
                message: payload.error_message,
            });
        }

        let Some(first) = payload.results.into_iter().next() else {
            return Err(RouteError::Resolution {
                status: "ZERO_RESULTS".to_string(),
                message: None,
            });
        };

        let coordinates = Coordinates::new(first.geometry.location.lat, first.geometry.location.lng);
        if !coordinates.is_valid() {
            return Err(RouteError::InvalidResponse(format!(
                "geocoder returned out-of-range location ({}, {})",
                coordinates.latitude, coordinates.longitude
            )));
        }

        Ok(GeocodeResult {
            address: first.formatted_address,
            coordinates,
        })
    }
}
