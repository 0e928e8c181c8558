//! Demo data provider backed by seed salons in YAML.
//!
//! Seed records use the backend's field names and go through the same
//! decoding boundary as live responses, so a seed file that would be
//! rejected from the backend is rejected here too.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use salonmap_core::{Coordinate, Salon, SalonId, SalonServiceDetail, Service, ServiceId};
use thiserror::Error;

use crate::error::ClientError;
use crate::normalize::normalize_salons;
use crate::source::SalonSource;
use crate::types::SalonWire;

const BUILTIN_SEED: &str = include_str!("../seed/salons.yaml");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("seed data in {context} is not valid YAML: {source}")]
    Yaml {
        context: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Normalize(#[from] ClientError),
}

/// A [`SalonSource`] that serves a fixed set of salons from memory.
#[derive(Debug, Clone)]
pub struct DemoSalonSource {
    salons: Vec<Salon>,
}

impl DemoSalonSource {
    /// The salons bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] only if the bundled file is malformed.
    pub fn builtin() -> Result<Self, SeedError> {
        Self::from_yaml_str(BUILTIN_SEED, "built-in seed")
    }

    /// Loads salons from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Io`] if the file cannot be read, or the same
    /// errors as [`DemoSalonSource::from_yaml_str`].
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw, &path.display().to_string())
    }

    /// Loads the file at `path` when given, otherwise the built-in set.
    ///
    /// # Errors
    ///
    /// Same as [`DemoSalonSource::from_path`].
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, SeedError> {
        match path {
            Some(p) => Self::from_path(p),
            None => Self::builtin(),
        }
    }

    /// Parses a YAML list of salon records.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Yaml`] if the text is not a list of salon
    /// records, or [`SeedError::Normalize`] if a record is missing a required
    /// field.
    pub fn from_yaml_str(raw: &str, context: &str) -> Result<Self, SeedError> {
        let wires: Vec<SalonWire> = serde_yaml::from_str(raw).map_err(|source| SeedError::Yaml {
            context: context.to_owned(),
            source,
        })?;
        let salons = normalize_salons(wires, context)?;
        tracing::debug!(context, count = salons.len(), "loaded seed salons");
        Ok(Self { salons })
    }

    #[must_use]
    pub fn from_salons(salons: Vec<Salon>) -> Self {
        Self { salons }
    }

    #[must_use]
    pub fn salons(&self) -> &[Salon] {
        &self.salons
    }

    /// Salons within `radius_km` of `center`, nearest first. Without a
    /// radius every salon is returned in seed order.
    #[must_use]
    pub fn near(&self, center: Coordinate, radius_km: Option<f64>) -> Vec<Salon> {
        let Some(radius) = radius_km else {
            return self.salons.clone();
        };
        let mut hits: Vec<(f64, &Salon)> = self
            .salons
            .iter()
            .map(|s| (center.distance_km(&s.coordinate), s))
            .filter(|(d, _)| *d <= radius)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, s)| s.clone()).collect()
    }

    /// Distinct services across all seed salons, first occurrence wins.
    #[must_use]
    pub fn services(&self) -> Vec<Service> {
        let mut seen: HashSet<&ServiceId> = HashSet::new();
        self.salons
            .iter()
            .flat_map(|s| &s.services)
            .filter(|offering| seen.insert(&offering.service.id))
            .map(|offering| offering.service.clone())
            .collect()
    }
}

#[async_trait]
impl SalonSource for DemoSalonSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn salons_near(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        Ok(self.near(center, radius_km))
    }

    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        Ok(self.salons.clone())
    }

    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        Ok(self.services())
    }

    async fn salon_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        let salon = self
            .salons
            .iter()
            .find(|s| &s.id == salon_id)
            .ok_or_else(|| ClientError::NotFound {
                url: format!("demo://saloons/{salon_id}/services"),
            })?;
        Ok(salon
            .services
            .iter()
            .map(|o| SalonServiceDetail {
                service: o.service.clone(),
                price: Some(o.price),
                duration_minutes: Some(o.duration_minutes),
                is_available: o.is_available,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    const HELSINKI: Coordinate = Coordinate::new(60.1699, 24.9384);

    #[test]
    fn builtin_seed_parses() {
        let demo = DemoSalonSource::builtin().unwrap();
        assert_eq!(demo.salons().len(), 4);
        let kamppi = &demo.salons()[0];
        assert_eq!(kamppi.id.as_str(), "demo-1");
        assert_eq!(kamppi.services[0].price, Decimal::new(4500, 2));
        assert_eq!(kamppi.services[1].service.work_types.len(), 2);
    }

    #[test]
    fn radius_filter_uses_distance_and_sorts_nearest_first() {
        let demo = DemoSalonSource::builtin().unwrap();
        let near = demo.near(HELSINKI, Some(5.0));
        let ids: Vec<&str> = near.iter().map(|s| s.id.as_str()).collect();
        assert!(!ids.contains(&"demo-4"), "Espoo is outside 5 km: {ids:?}");
        assert_eq!(ids.first(), Some(&"demo-1"));
        assert_eq!(demo.near(HELSINKI, None).len(), 4);
    }

    #[test]
    fn services_are_deduplicated_first_wins() {
        let demo = DemoSalonSource::builtin().unwrap();
        let services = demo.services();
        let haircuts = services
            .iter()
            .filter(|s| s.id.as_str() == "svc-haircut")
            .count();
        assert_eq!(haircuts, 1);
        assert_eq!(services.len(), 6);
    }

    #[test]
    fn seed_without_coordinates_is_dropped() {
        let yaml = "- { id: a, name: A, latitude: 60.0, longitude: 25.0 }\n- { id: b, name: B }\n";
        let demo = DemoSalonSource::from_yaml_str(yaml, "inline").unwrap();
        assert_eq!(demo.salons().len(), 1);
    }

    #[test]
    fn seed_missing_name_is_rejected() {
        let yaml = "- { id: a, latitude: 60.0, longitude: 25.0 }\n";
        let err = DemoSalonSource::from_yaml_str(yaml, "inline").unwrap_err();
        assert!(matches!(err, SeedError::Normalize(ClientError::InvalidShape { .. })));
    }

    #[test]
    fn non_list_seed_is_a_yaml_error() {
        let err = DemoSalonSource::from_yaml_str("salons: 3", "inline").unwrap_err();
        assert!(matches!(err, SeedError::Yaml { .. }));
    }

    #[test]
    fn missing_seed_file_is_an_io_error() {
        let err = DemoSalonSource::from_path(Path::new("/nonexistent/seed.yaml")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[tokio::test]
    async fn unknown_salon_services_is_not_found() {
        let demo = DemoSalonSource::builtin().unwrap();
        let err = demo
            .salon_services(&SalonId::new("nope"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotFound { .. }));

        let details = demo.salon_services(&SalonId::new("demo-2")).await.unwrap();
        assert_eq!(details.len(), 2);
        assert!(!details[1].is_available);
    }
}
