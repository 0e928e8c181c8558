pub mod client;
pub mod demo;
pub mod error;
pub mod location;
pub mod normalize;
pub(crate) mod retry;
pub mod repository;
pub mod source;
pub mod types;

pub use client::BookingApiClient;
pub use demo::{DemoSalonSource, SeedError};
pub use error::ClientError;
pub use location::{
    Accuracy, FallbackReason, FixOrigin, LocationFix, LocationProvider, PermissionStatus,
    PositionError, PositionSource, StaticPositionSource,
};
pub use repository::{Provenance, RepositoryError, SalonLoad, SalonRepository, SetupError};
pub use source::SalonSource;
