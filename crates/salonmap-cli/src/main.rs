mod discover;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "salonmap")]
#[command(about = "Find salons near a location and search their services")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to search from. Omitting both coordinates behaves like a denied
/// location permission and uses the configured fallback coordinate.
#[derive(Debug, Clone, Copy, Args)]
struct LocationArgs {
    /// Latitude in decimal degrees
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,
    /// Search radius in kilometres (defaults to SALONMAP_SEARCH_RADIUS_KM)
    #[arg(long)]
    radius: Option<f64>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List salons around a location
    Salons {
        #[command(flatten)]
        location: LocationArgs,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Rank salons and services against a free-text query
    Search {
        query: String,
        #[command(flatten)]
        location: LocationArgs,
        #[arg(long)]
        json: bool,
    },
    /// List the services offered by one salon
    Services { salon_id: String },
    /// Show bookable slots for a salon service on a date
    Slots {
        salon_id: String,
        /// Service id
        #[arg(long)]
        service: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = salonmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(
        env = %config.env,
        data_source = %config.data_source,
        api_base_url = %config.api_base_url,
        "configuration loaded"
    );

    match cli.command {
        Commands::Salons { location, json } => {
            discover::run_salons(&config, location, json).await?;
        }
        Commands::Search {
            query,
            location,
            json,
        } => discover::run_search(&config, location, &query, json).await?,
        Commands::Services { salon_id } => discover::run_services(&config, &salon_id).await?,
        Commands::Slots {
            salon_id,
            service,
            date,
        } => discover::run_slots(&config, &salon_id, &service, date).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
