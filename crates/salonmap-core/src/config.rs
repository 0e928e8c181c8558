use crate::app_config::{AppConfig, DataSource, Environment};
use crate::geo::Coordinate;
use crate::ConfigError;

const DEV_API_BASE_URL: &str = "http://localhost:3000/api";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a pure
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let value = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(var, "must be a finite number".to_string()))
        }
    };

    let env = parse_environment(&or_default("SALONMAP_ENV", "development"))?;

    let api_base_url = match lookup("SALONMAP_API_BASE_URL") {
        Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
        _ if env == Environment::Production => {
            return Err(ConfigError::MissingEnvVar(
                "SALONMAP_API_BASE_URL".to_string(),
            ))
        }
        _ => DEV_API_BASE_URL.to_string(),
    };

    let log_level = or_default("SALONMAP_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("SALONMAP_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "SALONMAP_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let user_agent = or_default("SALONMAP_USER_AGENT", "salonmap/0.1 (salon-discovery)");
    let max_retries = parse_u32("SALONMAP_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("SALONMAP_RETRY_BACKOFF_BASE_MS", "500")?;

    let search_radius_km = parse_f64("SALONMAP_SEARCH_RADIUS_KM", "10")?;
    if search_radius_km <= 0.0 {
        return Err(invalid(
            "SALONMAP_SEARCH_RADIUS_KM",
            "must be greater than zero".to_string(),
        ));
    }

    let location_timeout_ms = parse_u64("SALONMAP_LOCATION_TIMEOUT_MS", "8000")?;

    let fallback_lat = parse_f64("SALONMAP_FALLBACK_LAT", "60.1699")?;
    let fallback_lng = parse_f64("SALONMAP_FALLBACK_LNG", "24.9384")?;
    let fallback_coordinate = Coordinate::from_parts(Some(fallback_lat), Some(fallback_lng))
        .ok_or_else(|| {
            invalid(
                "SALONMAP_FALLBACK_LAT",
                format!("{fallback_lat},{fallback_lng} is not a valid coordinate"),
            )
        })?;

    let data_source = parse_data_source(&or_default("SALONMAP_DATA_SOURCE", "remote"))?;

    let seed_default = if env == Environment::Development {
        "true"
    } else {
        "false"
    };
    let seed_on_failure = parse_bool(
        "SALONMAP_SEED_ON_FAILURE",
        &or_default("SALONMAP_SEED_ON_FAILURE", seed_default),
    )?;
    let seed_path = lookup("SALONMAP_SEED_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let fly_to_ms = parse_u64("SALONMAP_FLY_TO_MS", "500")?;

    Ok(AppConfig {
        env,
        api_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        search_radius_km,
        location_timeout_ms,
        fallback_coordinate,
        data_source,
        seed_on_failure,
        seed_path,
        fly_to_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SALONMAP_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

fn parse_data_source(s: &str) -> Result<DataSource, ConfigError> {
    match s {
        "remote" => Ok(DataSource::Remote),
        "demo" => Ok(DataSource::Demo),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SALONMAP_DATA_SOURCE".to_string(),
            reason: format!("expected remote or demo; got \"{other}\""),
        }),
    }
}

fn parse_bool(var: &str, s: &str) -> Result<bool, ConfigError> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
