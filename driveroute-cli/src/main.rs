use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use driveroute::{Config, Language};

mod commands;

/// Geocoding and driving-route CLI tool
#[derive(Parser)]
#[command(name = "driveroute")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Google Maps Platform API key
    #[arg(short = 'k', long, env = "GCP_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Language for upstream requests and duration formatting (ja, en)
    #[arg(short, long, global = true)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an address to coordinates
    Geocode {
        /// Free-text address
        address: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Compute a driving route between two addresses
    Route {
        /// Origin address
        origin: String,

        /// Destination address
        destination: String,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the effective configuration (keys redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Invalid configuration in environment")?;
    if let Some(api_key) = cli.api_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = Some(api_key);
    }
    if let Some(language) = cli.language {
        config.language = language;
    }

    match cli.command {
        Commands::Geocode { address, json } => commands::geocode::run(config, &address, json).await,
        Commands::Route {
            origin,
            destination,
            json,
        } => commands::route::run(config, &origin, &destination, json).await,
        Commands::Config => commands::config::run(&config),
    }
}
