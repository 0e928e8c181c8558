//! Command handlers for the CLI.
//!
//! `salons` and `search` run the same load path as the map screen: acquire a
//! location (or fall back), load salons with the broaden-on-empty policy, and
//! build the service index. `services` and `slots` query the backend
//! directly.

use std::sync::Arc;

use anyhow::{bail, ensure, Context};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use salonmap_client::{
    BookingApiClient, LocationProvider, Provenance, SalonRepository, StaticPositionSource,
};
use salonmap_core::{AppConfig, Coordinate, DataSource, Salon, SalonId, ServiceId};
use salonmap_discovery::{DiscoverySession, LoadSummary, MapSyncController, RefreshOutcome};

use crate::LocationArgs;

/// Placeholder for missing values in tables.
const NONE: &str = "\u{2014}";

/// Validates `--lat/--lng`. `None` means no position was given.
pub(crate) fn resolve_position(location: LocationArgs) -> anyhow::Result<Option<Coordinate>> {
    match (location.lat, location.lng) {
        (None, None) => Ok(None),
        (lat, lng) => Coordinate::from_parts(lat, lng)
            .map(Some)
            .with_context(|| format!("invalid coordinate {lat:?},{lng:?}")),
    }
}

pub(crate) fn resolve_radius(location: LocationArgs, config: &AppConfig) -> anyhow::Result<f64> {
    let radius = location.radius.unwrap_or(config.search_radius_km);
    ensure!(
        radius.is_finite() && radius > 0.0,
        "radius must be a positive number of kilometres, got {radius}"
    );
    Ok(radius)
}

pub(crate) fn fmt_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| NONE.to_string(), |p| format!("{:.2}", p.round_dp(2)))
}

pub(crate) fn fmt_minutes(minutes: Option<u32>) -> String {
    minutes.map_or_else(|| NONE.to_string(), |m| format!("{m} min"))
}

async fn load(
    config: &AppConfig,
    location: LocationArgs,
) -> anyhow::Result<(DiscoverySession, LoadSummary)> {
    let position = resolve_position(location)?;
    let radius = resolve_radius(location, config)?;

    let provider = LocationProvider::from_config(
        Arc::new(StaticPositionSource::new(position)),
        config,
    );
    let repository = SalonRepository::from_config(config)?;
    let session = DiscoverySession::new(
        provider,
        repository,
        MapSyncController::from_config(config),
        Some(radius),
    );

    let summary = match session.refresh().await? {
        RefreshOutcome::Loaded(summary) => summary,
        RefreshOutcome::Superseded => bail!("salon load was superseded"),
    };

    if let Some(notice) = summary.fix.notice() {
        eprintln!("note: {notice}; searching around {}", summary.fix.coordinate);
    }
    match summary.provenance {
        Provenance::Nearby => {}
        Provenance::AllSalons => eprintln!("note: nothing within {radius} km, showing all salons"),
        Provenance::Seed => eprintln!("note: salons could not be loaded, showing demo data"),
    }

    Ok((session, summary))
}

fn print_salon_row(salon: &Salon, origin: Coordinate, score: Option<u32>) {
    let address = salon.address.as_deref().unwrap_or(NONE);
    let distance = origin.distance_km(&salon.coordinate);
    let score = score.map_or_else(String::new, |s| format!("[{s}] "));
    println!(
        "{score}{:<12} {:<30} {:>4.1}★ {:>5} reviews {:>6.1} km  {address}",
        salon.id.as_str(),
        salon.name,
        salon.average_rating,
        salon.review_count,
        distance,
    );
}

/// `salons`: list salons around the location.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or salons cannot be loaded.
pub(crate) async fn run_salons(
    config: &AppConfig,
    location: LocationArgs,
    json: bool,
) -> anyhow::Result<()> {
    let (session, summary) = load(config, location).await?;
    let salons = session.salons().await;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "load": summary,
                "salons": salons,
            }))?
        );
        return Ok(());
    }

    if salons.is_empty() {
        println!("no salons found");
        return Ok(());
    }
    for salon in &salons {
        print_salon_row(salon, summary.fix.coordinate, None);
    }
    Ok(())
}

/// `search <query>`: rank the loaded salons and services.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or salons cannot be loaded.
pub(crate) async fn run_search(
    config: &AppConfig,
    location: LocationArgs,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    let (session, summary) = load(config, location).await?;
    let results = session.search(query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("Salons");
    if results.salons.is_empty() {
        println!("  (no matches)");
    }
    for ranked in &results.salons {
        print_salon_row(&ranked.salon, summary.fix.coordinate, Some(ranked.score));
    }

    println!();
    println!("Services");
    if results.services.is_empty() {
        println!("  (no matches)");
    }
    for service in &results.services {
        let category = service
            .category
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or(NONE);
        println!("  {:<16} {:<30} {category}", service.id.as_str(), service.name);
    }
    Ok(())
}

/// `services <salon-id>`: one salon's services with its pricing.
///
/// # Errors
///
/// Returns an error if the source cannot be built or the request fails.
pub(crate) async fn run_services(config: &AppConfig, salon_id: &str) -> anyhow::Result<()> {
    let repository = SalonRepository::from_config(config)?;
    let details = repository
        .salon_services(&SalonId::new(salon_id))
        .await
        .with_context(|| format!("could not load services of salon {salon_id}"))?;

    if details.is_empty() {
        println!("salon {salon_id} lists no services");
        return Ok(());
    }
    for detail in &details {
        let availability = if detail.is_available { "" } else { " (unavailable)" };
        println!(
            "{:<16} {:<30} {:>8} {:>8}{availability}",
            detail.service.id.as_str(),
            detail.service.name,
            fmt_price(detail.price),
            fmt_minutes(detail.duration_minutes),
        );
        for work_type in &detail.service.work_types {
            println!(
                "  - {:<40} {:>8} {:>8}",
                work_type.name,
                fmt_price(work_type.price),
                fmt_minutes(work_type.duration_minutes),
            );
        }
    }
    Ok(())
}

/// `slots <salon-id> --service <id> --date <date>`.
///
/// # Errors
///
/// Returns an error when the data source is not the backend, or the request
/// fails.
pub(crate) async fn run_slots(
    config: &AppConfig,
    salon_id: &str,
    service_id: &str,
    date: NaiveDate,
) -> anyhow::Result<()> {
    ensure!(
        config.data_source == DataSource::Remote,
        "slot availability needs the backend (SALONMAP_DATA_SOURCE=remote)"
    );
    let client = BookingApiClient::from_config(config)?;
    let slots = client
        .available_slots(&SalonId::new(salon_id), &ServiceId::new(service_id), date)
        .await
        .with_context(|| format!("could not load slots of salon {salon_id} on {date}"))?;

    if slots.is_closed {
        println!(
            "closed on {date}{}",
            slots
                .message
                .as_deref()
                .map(|m| format!(": {m}"))
                .unwrap_or_default()
        );
        return Ok(());
    }
    if !slots.has_availability() {
        println!("no free slots on {date}");
        return Ok(());
    }
    let times: Vec<String> = slots
        .slots
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    println!("{date}: {}", times.join(" "));
    Ok(())
}
