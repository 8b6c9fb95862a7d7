//! HTTP request handlers for the route service.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use driveroute::{Coordinates, RouteError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::AppState;

/// Query parameters for the geocode endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GeocodeQuery {
    /// Free-text address to resolve.
    #[serde(default)]
    pub address: String,
}

/// Route request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RouteRequest {
    /// Origin address.
    pub origin: String,
    /// Destination address.
    pub destination: String,
}

/// Latitude/longitude pair.
#[derive(Debug, Serialize, ToSchema)]
pub struct CoordinatesResponse {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for CoordinatesResponse {
    fn from(coords: Coordinates) -> Self {
        Self {
            latitude: coords.latitude,
            longitude: coords.longitude,
        }
    }
}

/// Successful geocode response.
#[derive(Debug, Serialize, ToSchema)]
pub struct GeocodeResponse {
    /// Formatted address of the first candidate.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Successful route response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteResponse {
    /// Distance, e.g. "10.5 km".
    pub distance: String,
    /// Duration, e.g. "25分".
    pub duration: String,
    /// Encoded polyline of the route.
    pub polyline: String,
    pub origin_coords: CoordinatesResponse,
    pub destination_coords: CoordinatesResponse,
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub detail: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    pub message: String,
}

/// Frontend configuration response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    /// Key for the frontend map widget, or null when not exposed.
    #[serde(rename = "mapsApiKey")]
    pub maps_api_key: Option<String>,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "driveroute backend is running".to_string(),
    })
}

/// Frontend configuration.
///
/// Returns the key the browser map widget should use. A dedicated
/// browser-restricted key is preferred over the server key.
#[utoipa::path(
    get,
    path = "/api/config",
    tag = "system",
    responses((status = 200, description = "Frontend configuration", body = ConfigResponse))
)]
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        maps_api_key: state.route_service.maps_api_key().map(str::to_string),
    })
}

/// Resolve an address to coordinates.
///
/// # Returns
///
/// - `200 OK` with the formatted address and coordinates
/// - `400 Bad Request` if the address is blank or cannot be resolved
/// - upstream status if the Geocoding API call fails
/// - `500 Internal Server Error` if no API key is configured
#[utoipa::path(
    get,
    path = "/api/geocode",
    tag = "routing",
    params(GeocodeQuery),
    responses(
        (status = 200, description = "Address resolved", body = GeocodeResponse),
        (status = 400, description = "Address could not be resolved", body = ErrorResponse),
        (status = 500, description = "API key not configured", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GeocodeQuery>,
) -> impl IntoResponse {
    tracing::debug!(address = %query.address, "Geocode query");

    match state.route_service.geocode(&query.address).await {
        Ok(result) => (
            StatusCode::OK,
            Json(GeocodeResponse {
                address: result.address,
                latitude: result.coordinates.latitude,
                longitude: result.coordinates.longitude,
            }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// Compute a driving route between two addresses.
///
/// # Returns
///
/// - `200 OK` with distance, duration, polyline and endpoint coordinates
/// - `400 Bad Request` if either address cannot be resolved
/// - `404 Not Found` if no route exists
/// - `422 Unprocessable Entity` if the body is not a valid route request
/// - upstream status if a Geocoding or Routes API call fails
/// - `500 Internal Server Error` if no API key is configured
#[utoipa::path(
    post,
    path = "/api/route",
    tag = "routing",
    request_body = RouteRequest,
    responses(
        (status = 200, description = "Route computed", body = RouteResponse),
        (status = 400, description = "Address could not be resolved", body = ErrorResponse),
        (status = 404, description = "No route between the locations", body = ErrorResponse),
        (status = 422, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "API key not configured", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn compute_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> impl IntoResponse {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return invalid_body(&rejection),
    };

    match state
        .route_service
        .compute_route(&request.origin, &request.destination)
        .await
    {
        Ok(route) => {
            tracing::info!(
                distance = %route.distance,
                duration = %route.duration,
                "Route computed"
            );
            (
                StatusCode::OK,
                Json(RouteResponse {
                    distance: route.distance,
                    duration: route.duration,
                    polyline: route.polyline,
                    origin_coords: route.origin_coords.into(),
                    destination_coords: route.destination_coords.into(),
                }),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// HTTP status for a library error.
pub fn status_for(e: &RouteError) -> StatusCode {
    match e {
        RouteError::MissingApiKey | RouteError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        RouteError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        RouteError::Resolution { .. } | RouteError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RouteError::NoRoute => StatusCode::NOT_FOUND,
        RouteError::Request(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        RouteError::Request(_) | RouteError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Response for a route request body that could not be extracted.
///
/// Syntax errors, missing fields and a missing JSON content type all answer
/// 422 with the same error body as every other failure.
fn invalid_body(rejection: &JsonRejection) -> axum::response::Response {
    tracing::info!(
        status = StatusCode::UNPROCESSABLE_ENTITY.as_u16(),
        error = %rejection.body_text(),
        "Request body rejected"
    );

    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            detail: rejection.body_text(),
        }),
    )
        .into_response()
}

/// Create an error response.
fn error_response(e: &RouteError) -> axum::response::Response {
    let status = status_for(e);

    if status.is_server_error() {
        tracing::warn!(status = status.as_u16(), error = %e, "Request failed");
    } else {
        tracing::info!(status = status.as_u16(), error = %e, "Request rejected");
    }

    (
        status,
        Json(ErrorResponse {
            detail: e.to_string(),
        }),
    )
        .into_response()
}
