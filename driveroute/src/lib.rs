//! # driveroute - Geocoding and Driving Routes
//!
//! Thin client library over Google Maps Platform for turning a pair of
//! free-text addresses into a driving route summary.
//!
//! ## Features
//!
//! - **Geocoding**: resolve an address to a formatted address and coordinates
//! - **Routing**: driving distance, duration and encoded polyline between two addresses
//! - **Formatting**: short human-readable distance and duration strings (`ja` / `en`)
//! - **Bounded**: every outbound request carries a timeout; nothing is retried or cached
//!
//! ## Quick Start
//!
//! ```ignore
//! use driveroute::{Config, RouteService};
//!
//! let service = RouteService::new(Config::with_api_key("YOUR_KEY"))?;
//!
//! let place = service.geocode("東京駅").await?;
//! println!("{} ({}, {})", place.address, place.coordinates.latitude, place.coordinates.longitude);
//!
//! let route = service.compute_route("東京駅", "大阪駅").await?;
//! println!("{} / {}", route.distance, route.duration);
//! ```

pub mod config;
pub mod coords;
pub mod error;
pub mod format;
pub mod geocode;
pub mod routes;
pub mod service;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use coords::{Coordinates, GeocodeResult, RouteSummary};
pub use error::{Result, RouteError, UpstreamService};
pub use format::{format_distance, format_duration, Language};
pub use service::{RouteService, RouteServiceBuilder};
