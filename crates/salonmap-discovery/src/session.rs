//! Screen-scoped discovery context.
//!
//! A [`DiscoverySession`] owns everything one map screen needs: the
//! location provider, the salon repository, the map sync controller, and
//! the service index built from the last load. Loads are single-flight with
//! cancel-and-replace: each `refresh` takes a new generation number and only
//! the newest generation may publish its result.

use std::sync::atomic::{AtomicU64, Ordering};

use salonmap_client::{
    LocationFix, LocationProvider, Provenance, RepositoryError, SalonRepository,
};
use salonmap_core::{AppConfig, Salon};
use salonmap_search::{SearchRanker, SearchResults, ServiceIndex};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::map_sync::MapSyncController;
use crate::surface::SurfaceCommand;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Load(#[from] RepositoryError),
}

impl DiscoveryError {
    /// User-facing message for the error state.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DiscoveryError::Load(_) => "could not load salons",
        }
    }
}

/// What a completed refresh published.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadSummary {
    pub fix: LocationFix,
    pub provenance: Provenance,
    pub salon_count: usize,
    pub service_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Loaded(LoadSummary),
    /// A newer refresh started while this one was in flight; its result was
    /// discarded.
    Superseded,
}

struct Screen {
    controller: MapSyncController,
    services: ServiceIndex,
    last_load: Option<LoadSummary>,
}

pub struct DiscoverySession {
    location: LocationProvider,
    repository: SalonRepository,
    radius_km: Option<f64>,
    generation: AtomicU64,
    screen: Mutex<Screen>,
}

impl DiscoverySession {
    #[must_use]
    pub fn new(
        location: LocationProvider,
        repository: SalonRepository,
        controller: MapSyncController,
        radius_km: Option<f64>,
    ) -> Self {
        Self {
            location,
            repository,
            radius_km,
            generation: AtomicU64::new(0),
            screen: Mutex::new(Screen {
                controller,
                services: ServiceIndex::default(),
                last_load: None,
            }),
        }
    }

    #[must_use]
    pub fn from_config(
        location: LocationProvider,
        repository: SalonRepository,
        config: &AppConfig,
    ) -> Self {
        Self::new(
            location,
            repository,
            MapSyncController::from_config(config),
            Some(config.search_radius_km),
        )
    }

    /// Acquires a location, loads salons around it, and rebuilds the service
    /// index. A refresh started later wins over one still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Load`] when salons cannot be loaded and no
    /// seed data covers the failure. A superseded refresh never errors.
    pub async fn refresh(&self) -> Result<RefreshOutcome, DiscoveryError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let fix = self.location.acquire().await;
        let loaded = self
            .repository
            .fetch_near(Some(fix.coordinate), self.radius_km)
            .await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "refresh superseded during salon load");
            return Ok(RefreshOutcome::Superseded);
        }
        let load = loaded?;

        // Seed loads index the seed offerings only.
        let catalog = if load.provenance == Provenance::Seed {
            Vec::new()
        } else {
            self.repository.fetch_service_catalog().await
        };
        let services = if catalog.is_empty() {
            ServiceIndex::build(&load.salons)
        } else {
            ServiceIndex::from_services(catalog)
        };

        let mut screen = self.screen.lock().await;
        if !self.is_current(generation) {
            tracing::debug!(generation, "refresh superseded before publish");
            return Ok(RefreshOutcome::Superseded);
        }
        let summary = LoadSummary {
            fix,
            provenance: load.provenance,
            salon_count: load.salons.len(),
            service_count: services.len(),
        };
        screen.controller.load_salons(load.salons);
        screen.services = services;
        screen.last_load = Some(summary.clone());
        tracing::info!(
            generation,
            provenance = %summary.provenance,
            salons = summary.salon_count,
            services = summary.service_count,
            "discovery refreshed"
        );
        Ok(RefreshOutcome::Loaded(summary))
    }

    /// Ranks the loaded salons and services against `query`.
    pub async fn search(&self, query: &str) -> SearchResults {
        let screen = self.screen.lock().await;
        SearchRanker::new(screen.controller.salons(), &screen.services).search(query)
    }

    /// Applies one raw render-surface message.
    pub async fn handle_message(&self, raw: &str) -> Vec<SurfaceCommand> {
        self.screen.lock().await.controller.handle_message(raw)
    }

    /// Search pick from a result list.
    pub async fn pick_search_result(&self, salon: &Salon) -> Vec<SurfaceCommand> {
        self.screen
            .lock()
            .await
            .controller
            .select_from_search_result(salon)
    }

    /// Runs `f` against the map sync controller.
    pub async fn with_controller<R>(&self, f: impl FnOnce(&mut MapSyncController) -> R) -> R {
        f(&mut self.screen.lock().await.controller)
    }

    pub async fn salons(&self) -> Vec<Salon> {
        self.screen.lock().await.controller.salons().to_vec()
    }

    pub async fn last_load(&self) -> Option<LoadSummary> {
        self.screen.lock().await.last_load.clone()
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
