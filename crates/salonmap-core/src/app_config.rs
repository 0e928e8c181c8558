use std::path::PathBuf;
use std::time::Duration;

use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Which salon source backs the discovery screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// The booking backend at `api_base_url`.
    Remote,
    /// Seed salons only; never touches the network.
    Demo,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Remote => write!(f, "remote"),
            DataSource::Demo => write!(f, "demo"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub api_base_url: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub search_radius_km: f64,
    pub location_timeout_ms: u64,
    pub fallback_coordinate: Coordinate,
    pub data_source: DataSource,
    pub seed_on_failure: bool,
    pub seed_path: Option<PathBuf>,
    pub fly_to_ms: u64,
}

impl AppConfig {
    #[must_use]
    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    #[must_use]
    pub fn fly_to_duration(&self) -> Duration {
        Duration::from_millis(self.fly_to_ms)
    }
}
