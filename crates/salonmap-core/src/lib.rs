pub mod app_config;
pub mod config;
pub mod geo;
pub mod salons;
pub mod slots;

use thiserror::Error;

pub use app_config::{AppConfig, DataSource, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::Coordinate;
pub use salons::{
    CategoryRef, Salon, SalonId, SalonServiceDetail, Service, ServiceId, ServiceOffering, WorkType,
};
pub use slots::AvailableSlots;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
