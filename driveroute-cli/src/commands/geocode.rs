use anyhow::{Context, Result};
use driveroute::{Config, RouteService};
use serde::Serialize;

#[derive(Serialize)]
struct GeocodeOutput {
    address: String,
    latitude: f64,
    longitude: f64,
}

pub async fn run(config: Config, address: &str, json: bool) -> Result<()> {
    let service = RouteService::new(config).context("Failed to create route service")?;

    let result = service
        .geocode(address)
        .await
        .with_context(|| format!("Failed to geocode '{}'", address))?;

    if json {
        let output = GeocodeOutput {
            address: result.address,
            latitude: result.coordinates.latitude,
            longitude: result.coordinates.longitude,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!(
            "{}\t{:.6}\t{:.6}",
            result.address, result.coordinates.latitude, result.coordinates.longitude
        );
    }

    Ok(())
}
