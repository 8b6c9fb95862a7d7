//! driveroute Service - HTTP backend for geocoding and driving routes.
//!
//! Resolves addresses with the Google Geocoding API and computes driving
//! routes with the Google Routes API for a browser map frontend.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `GCP_API_KEY` | Google Maps Platform server key | Required for geocode/route |
//! | `FRONTEND_ORIGIN` | Allowed CORS origin | `http://localhost:3000` |
//! | `MAPS_BROWSER_KEY` | Browser-restricted key for `/api/config` | None |
//! | `DRIVEROUTE_EXPOSE_MAPS_KEY` | Return `GCP_API_KEY` from `/api/config` when no browser key | true |
//! | `DRIVEROUTE_LANGUAGE` | `ja` or `en` | `ja` |
//! | `DRIVEROUTE_REGION` | Region code | `JP` |
//! | `DRIVEROUTE_UPSTREAM_TIMEOUT_SECS` | Outbound request timeout | 10 |
//! | `DRIVEROUTE_PORT` | HTTP server port | 8000 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! A `.env` file in the working directory is loaded first.
//!
//! ## Endpoints
//!
//! - `GET /` - Health check
//! - `GET /api/config` - Frontend map configuration
//! - `GET /api/geocode?address=X` - Resolve an address
//! - `POST /api/route` - Driving route between two addresses
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use driveroute::{Config, RouteService};
use driveroute_service::{build_router, port_from_env, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "driveroute=info,driveroute_service=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port = port_from_env()?;

    let config = Config::from_env()?;

    if config.api_key.is_none() {
        tracing::warn!("GCP_API_KEY not set, geocode and route requests will fail");
    }
    if config.maps_browser_key.is_none() && config.expose_maps_key && config.api_key.is_some() {
        tracing::warn!(
            "MAPS_BROWSER_KEY not set, /api/config hands out the server key; \
             set a browser-restricted key or DRIVEROUTE_EXPOSE_MAPS_KEY=false"
        );
    }

    tracing::info!(
        frontend_origin = %config.frontend_origin,
        language = config.language.code(),
        region = %config.region,
        timeout_secs = config.timeout.as_secs(),
        port = port,
        "Starting driveroute service"
    );

    let route_service = RouteService::new(config)?;
    let state = Arc::new(AppState { route_service });
    let app = build_router(state)?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
