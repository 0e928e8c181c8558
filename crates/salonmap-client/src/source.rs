//! The data-source seam between the repository and a concrete backend.

use async_trait::async_trait;
use salonmap_core::{Coordinate, Salon, SalonId, SalonServiceDetail, Service};

use crate::client::BookingApiClient;
use crate::error::ClientError;

/// A provider of salon and service records.
///
/// [`BookingApiClient`] talks to the live backend; [`crate::DemoSalonSource`]
/// serves the bundled seed data.
#[async_trait]
pub trait SalonSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Salons around `center`, optionally limited to `radius_km`.
    async fn salons_near(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError>;

    /// Every salon the source knows about.
    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError>;

    /// The service catalog used to build the search index.
    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError>;

    async fn salon_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError>;
}

#[async_trait]
impl SalonSource for BookingApiClient {
    fn name(&self) -> &'static str {
        "backend"
    }

    async fn salons_near(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        BookingApiClient::salons_near(self, center, radius_km).await
    }

    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        BookingApiClient::all_salons(self).await
    }

    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        BookingApiClient::service_catalog(self).await
    }

    async fn salon_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        BookingApiClient::salon_services(self, salon_id).await
    }
}
