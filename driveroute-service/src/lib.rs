//! driveroute Service Library
//!
//! HTTP handlers, router and OpenAPI document for the route service.
//! This library is used by both the driveroute-service binary and integration tests.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::{header::InvalidHeaderValue, HeaderValue},
    routing::{get, post},
    Router,
};
use driveroute::{RouteError, RouteService};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across handlers.
pub struct AppState {
    /// Geocoding and routing service.
    pub route_service: RouteService,
}

/// HTTP port used when `DRIVEROUTE_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8000;

/// OpenAPI documentation for the route service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "driveroute Service",
        version = "0.1.0",
        description = "Geocoding and driving-route backend for map frontends.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::health_check,
        handlers::get_config,
        handlers::geocode,
        handlers::compute_route,
    ),
    components(
        schemas(
            handlers::RouteRequest,
            handlers::RouteResponse,
            handlers::GeocodeResponse,
            handlers::CoordinatesResponse,
            handlers::ConfigResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "routing", description = "Geocoding and route endpoints"),
        (name = "system", description = "System and configuration endpoints")
    )
)]
pub struct ApiDoc;

/// CORS layer allowing a single frontend origin with credentials.
///
/// Methods and headers are mirrored from the preflight request, since
/// wildcards cannot be combined with credentials.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the application router.
///
/// # Errors
///
/// Returns an error if the configured frontend origin is not a valid header value.
pub fn build_router(state: Arc<AppState>) -> Result<Router, InvalidHeaderValue> {
    let cors = cors_layer(&state.route_service.config().frontend_origin)?;

    Ok(Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::health_check))
        .route("/health", get(handlers::health_check))
        .route("/api/config", get(handlers::get_config))
        .route("/api/geocode", get(handlers::geocode))
        .route("/api/route", post(handlers::compute_route))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state))
}

/// Read the listen port from `DRIVEROUTE_PORT`.
///
/// # Errors
///
/// Returns [`RouteError::Config`] if the variable is set but is not a port in 1..=65535.
pub fn port_from_env() -> driveroute::Result<u16> {
    parse_port(std::env::var("DRIVEROUTE_PORT").ok().as_deref())
}

/// Parse a port value, falling back to [`DEFAULT_PORT`] when unset or blank.
pub fn parse_port(value: Option<&str>) -> driveroute::Result<u16> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_PORT);
    };

    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(RouteError::Config(format!(
            "DRIVEROUTE_PORT must be a port between 1 and 65535, got '{}'",
            value
        ))),
    }
}

// Re-export commonly used types for convenience
pub use handlers::{
    ConfigResponse, CoordinatesResponse, ErrorResponse, GeocodeQuery, GeocodeResponse,
    HealthResponse, RouteRequest, RouteResponse,
};
