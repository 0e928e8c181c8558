//! Salon loading with the broaden-on-empty fallback and optional seed data.
//!
//! The policy:
//!
//! | primary (nearby) call | then                                   | provenance  |
//! |-----------------------|----------------------------------------|-------------|
//! | non-empty             | done                                   | `Nearby`    |
//! | empty                 | unfiltered call                        | `AllSalons` |
//! | error                 | seed data, or `Unavailable`            | `Seed`      |
//!
//! An error on the nearby call never triggers the unfiltered call. If the
//! unfiltered call itself fails, seed data is used when configured,
//! otherwise `FallbackFailed` is returned.

use std::sync::Arc;

use salonmap_core::{AppConfig, Coordinate, DataSource, Salon, SalonId, SalonServiceDetail, Service};
use serde::Serialize;
use thiserror::Error;

use crate::client::BookingApiClient;
use crate::demo::{DemoSalonSource, SeedError};
use crate::error::ClientError;
use crate::source::SalonSource;

/// Where a loaded salon list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// The radius-filtered query around the caller's coordinate.
    Nearby,
    /// The unfiltered list, after the nearby query came back empty.
    AllSalons,
    /// Locally bundled demo data, never live.
    Seed,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Provenance::Nearby => "nearby",
            Provenance::AllSalons => "all salons",
            Provenance::Seed => "seed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalonLoad {
    pub salons: Vec<Salon>,
    pub provenance: Provenance,
}

impl SalonLoad {
    /// `true` unless the salons are seed data.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.provenance != Provenance::Seed
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The primary query failed and no seed data is configured.
    #[error("could not load salons: {source}")]
    Unavailable {
        #[source]
        source: ClientError,
    },

    /// The primary query came back empty and the unfiltered query failed.
    #[error("could not load salons: fallback query failed: {source}")]
    FallbackFailed {
        #[source]
        source: ClientError,
    },
}

impl RepositoryError {
    /// The underlying client error.
    #[must_use]
    pub fn client_error(&self) -> &ClientError {
        match self {
            RepositoryError::Unavailable { source } | RepositoryError::FallbackFailed { source } => {
                source
            }
        }
    }
}

/// Failure to assemble a repository from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Seed(#[from] SeedError),
}

pub struct SalonRepository {
    primary: Arc<dyn SalonSource>,
    seed: Option<DemoSalonSource>,
}

impl SalonRepository {
    #[must_use]
    pub fn new(primary: Arc<dyn SalonSource>) -> Self {
        Self {
            primary,
            seed: None,
        }
    }

    /// Serves `seed` when the primary source fails outright.
    #[must_use]
    pub fn with_seed(mut self, seed: DemoSalonSource) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Selects the primary source from `config.data_source` and attaches
    /// seed data when `config.seed_on_failure` is set.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the HTTP client cannot be built or the seed
    /// file cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, SetupError> {
        let seed_path = config.seed_path.as_deref();
        let repo = match config.data_source {
            DataSource::Remote => {
                let client = BookingApiClient::from_config(config)?;
                let repo = Self::new(Arc::new(client));
                if config.seed_on_failure {
                    repo.with_seed(DemoSalonSource::from_optional_path(seed_path)?)
                } else {
                    repo
                }
            }
            DataSource::Demo => Self::new(Arc::new(DemoSalonSource::from_optional_path(seed_path)?)),
        };
        tracing::debug!(
            source = repo.primary.name(),
            seed = repo.seed.is_some(),
            "salon repository configured"
        );
        Ok(repo)
    }

    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.primary.name()
    }

    /// Loads salons around `center`, broadening to the unfiltered list when
    /// the nearby query succeeds with no results. Without a center the
    /// unfiltered list is the primary query.
    ///
    /// # Errors
    ///
    /// - [`RepositoryError::Unavailable`] if the primary query fails and no
    ///   seed data is configured.
    /// - [`RepositoryError::FallbackFailed`] if the unfiltered query fails
    ///   and no seed data is configured.
    pub async fn fetch_near(
        &self,
        center: Option<Coordinate>,
        radius_km: Option<f64>,
    ) -> Result<SalonLoad, RepositoryError> {
        let (primary, provenance) = match center {
            Some(c) => (self.primary.salons_near(c, radius_km).await, Provenance::Nearby),
            None => (self.primary.all_salons().await, Provenance::AllSalons),
        };

        match primary {
            Ok(salons) if !salons.is_empty() || provenance == Provenance::AllSalons => {
                Ok(self.finish(salons, provenance))
            }
            Ok(_) => {
                tracing::debug!(
                    source = self.primary.name(),
                    ?radius_km,
                    "nearby query returned no salons, loading unfiltered list"
                );
                match self.primary.all_salons().await {
                    Ok(salons) => Ok(self.finish(salons, Provenance::AllSalons)),
                    Err(source) => self
                        .seed_load(center, radius_km, &source)
                        .ok_or(RepositoryError::FallbackFailed { source }),
                }
            }
            Err(source) => self
                .seed_load(center, radius_km, &source)
                .ok_or(RepositoryError::Unavailable { source }),
        }
    }

    /// The service catalog, or an empty list when the source cannot provide
    /// one. Callers then build the index from salon offerings.
    pub async fn fetch_service_catalog(&self) -> Vec<Service> {
        match self.primary.service_catalog().await {
            Ok(services) => services,
            Err(e) => {
                tracing::debug!(
                    source = self.primary.name(),
                    error = %e,
                    "service catalog unavailable"
                );
                Vec::new()
            }
        }
    }

    /// # Errors
    ///
    /// Returns the source's [`ClientError`] unchanged.
    pub async fn salon_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        self.primary.salon_services(salon_id).await
    }

    fn finish(&self, mut salons: Vec<Salon>, provenance: Provenance) -> SalonLoad {
        let before = salons.len();
        salons.retain(|s| s.coordinate.is_valid());
        if salons.len() < before {
            tracing::debug!(
                dropped = before - salons.len(),
                "dropped salons without a valid coordinate pair"
            );
        }
        tracing::info!(
            source = self.primary.name(),
            %provenance,
            count = salons.len(),
            "salons loaded"
        );
        SalonLoad { salons, provenance }
    }

    fn seed_load(
        &self,
        center: Option<Coordinate>,
        radius_km: Option<f64>,
        cause: &ClientError,
    ) -> Option<SalonLoad> {
        let seed = self.seed.as_ref()?;
        let near = center.map(|c| seed.near(c, radius_km)).unwrap_or_default();
        let salons = if near.is_empty() {
            seed.salons().to_vec()
        } else {
            near
        };
        tracing::warn!(
            source = self.primary.name(),
            error = %cause,
            count = salons.len(),
            "salon source failed, serving seed data"
        );
        Some(SalonLoad {
            salons,
            provenance: Provenance::Seed,
        })
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;
