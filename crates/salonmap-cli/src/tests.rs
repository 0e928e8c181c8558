use rust_decimal::Decimal;
use salonmap_core::{AppConfig, Coordinate, DataSource, Environment};

use super::*;
use crate::discover::{fmt_minutes, fmt_price, resolve_position, resolve_radius};

fn config() -> AppConfig {
    AppConfig {
        env: Environment::Test,
        api_base_url: "http://localhost:3000/api".to_string(),
        log_level: "info".to_string(),
        request_timeout_secs: 15,
        user_agent: "salonmap-test/0.1".to_string(),
        max_retries: 0,
        retry_backoff_base_ms: 0,
        search_radius_km: 10.0,
        location_timeout_ms: 8000,
        fallback_coordinate: Coordinate::new(60.1699, 24.9384),
        data_source: DataSource::Demo,
        seed_on_failure: false,
        seed_path: None,
        fly_to_ms: 500,
    }
}

fn location(lat: Option<f64>, lng: Option<f64>, radius: Option<f64>) -> LocationArgs {
    LocationArgs { lat, lng, radius }
}

#[test]
fn parses_salons_with_location() {
    let cli = Cli::try_parse_from([
        "salonmap", "salons", "--lat", "60.17", "--lng", "24.94", "--radius", "5",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Salons { location, json } => {
            assert_eq!(location.lat, Some(60.17));
            assert_eq!(location.lng, Some(24.94));
            assert_eq!(location.radius, Some(5.0));
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_negative_longitude() {
    let cli = Cli::try_parse_from(["salonmap", "salons", "--lat", "40.7", "--lng", "-74.0"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Salons { location, .. } if location.lng == Some(-74.0)
    ));
}

#[test]
fn help_is_handled_by_the_parser() {
    let err = Cli::try_parse_from(["salonmap", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn lat_without_lng_is_rejected() {
    assert!(Cli::try_parse_from(["salonmap", "salons", "--lat", "60.17"]).is_err());
}

#[test]
fn parses_search_query() {
    let cli = Cli::try_parse_from(["salonmap", "search", "gel nails", "--json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Search { ref query, json: true, .. } if query == "gel nails"
    ));
}

#[test]
fn parses_slots_date() {
    let cli = Cli::try_parse_from([
        "salonmap", "slots", "17", "--service", "gel", "--date", "2026-10-20",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Slots { ref salon_id, ref service, date }
            if salon_id == "17"
                && service == "gel"
                && date == NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    ));
}

#[test]
fn slots_rejects_bad_date() {
    assert!(Cli::try_parse_from([
        "salonmap", "slots", "17", "--service", "gel", "--date", "20/10/2026",
    ])
    .is_err());
}

#[test]
fn missing_position_means_fallback() {
    assert_eq!(resolve_position(location(None, None, None)).unwrap(), None);
    assert_eq!(
        resolve_position(location(Some(60.17), Some(24.94), None)).unwrap(),
        Some(Coordinate::new(60.17, 24.94))
    );
    assert!(resolve_position(location(Some(95.0), Some(24.94), None)).is_err());
}

#[test]
fn radius_defaults_to_config_and_must_be_positive() {
    let config = config();
    assert!((resolve_radius(location(None, None, None), &config).unwrap() - 10.0).abs() < f64::EPSILON);
    assert!((resolve_radius(location(None, None, Some(2.5)), &config).unwrap() - 2.5).abs() < f64::EPSILON);
    assert!(resolve_radius(location(None, None, Some(0.0)), &config).is_err());
}

#[test]
fn formats_prices_and_durations() {
    assert_eq!(fmt_price(Some(Decimal::new(455, 1))), "45.50");
    assert_eq!(fmt_price(None), "\u{2014}");
    assert_eq!(fmt_minutes(Some(60)), "60 min");
}

#[tokio::test]
async fn slots_require_remote_source() {
    let date = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
    let err = discover::run_slots(&config(), "17", "gel", date)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("SALONMAP_DATA_SOURCE=remote"));
}
