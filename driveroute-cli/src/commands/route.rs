use anyhow::{Context, Result};
use driveroute::{Config, Coordinates, RouteService};
use serde::Serialize;

#[derive(Serialize)]
struct CoordinatesOutput {
    latitude: f64,
    longitude: f64,
}

impl From<Coordinates> for CoordinatesOutput {
    fn from(c: Coordinates) -> Self {
        Self {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

#[derive(Serialize)]
struct RouteOutput {
    distance: String,
    duration: String,
    polyline: String,
    origin_coords: CoordinatesOutput,
    destination_coords: CoordinatesOutput,
}

pub async fn run(config: Config, origin: &str, destination: &str, json: bool) -> Result<()> {
    let service = RouteService::new(config).context("Failed to create route service")?;

    let route = service
        .compute_route(origin, destination)
        .await
        .with_context(|| format!("Failed to compute route '{}' -> '{}'", origin, destination))?;

    if json {
        let output = RouteOutput {
            distance: route.distance,
            duration: route.duration,
            polyline: route.polyline,
            origin_coords: route.origin_coords.into(),
            destination_coords: route.destination_coords.into(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Distance: {}", route.distance);
        println!("Duration: {}", route.duration);
        println!(
            "From:     {:.6}, {:.6}",
            route.origin_coords.latitude, route.origin_coords.longitude
        );
        println!(
            "To:       {:.6}, {:.6}",
            route.destination_coords.latitude, route.destination_coords.longitude
        );
    }

    Ok(())
}
