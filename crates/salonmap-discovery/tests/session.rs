//! Integration tests for `DiscoverySession`: refresh ordering, search over
//! the loaded list, and selection through surface messages.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use salonmap_client::{
    ClientError, DemoSalonSource, LocationProvider, Provenance, SalonRepository, SalonSource,
    StaticPositionSource,
};
use salonmap_core::{Coordinate, Salon, SalonId, SalonServiceDetail, Service};
use salonmap_discovery::{
    DiscoveryError, DiscoverySession, MapSyncController, RefreshOutcome, SurfaceCommand, SyncState,
};

const HELSINKI: Coordinate = Coordinate::new(60.1699, 24.9384);

fn salon(id: &str, name: &str, address: &str) -> Salon {
    Salon {
        id: SalonId::new(id),
        name: name.to_owned(),
        address: Some(address.to_owned()),
        coordinate: HELSINKI,
        average_rating: 4.0,
        review_count: 0,
        images: vec![],
        services: vec![],
    }
}

fn denied_location() -> LocationProvider {
    LocationProvider::new(
        Arc::new(StaticPositionSource::denied()),
        HELSINKI,
        Duration::from_secs(8),
    )
}

fn session(source: Arc<dyn SalonSource>) -> DiscoverySession {
    DiscoverySession::new(
        denied_location(),
        SalonRepository::new(source),
        MapSyncController::new(Duration::from_millis(500)),
        Some(10.0),
    )
}

/// First nearby call blocks until released and answers `old`; later calls
/// answer `new` immediately.
struct GatedSource {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl SalonSource for GatedSource {
    fn name(&self) -> &'static str {
        "gated"
    }

    async fn salons_near(
        &self,
        _center: Coordinate,
        _radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![salon("old", "Old Salon", "Somewhere 1")])
        } else {
            Ok(vec![salon("new", "New Salon", "Elsewhere 2")])
        }
    }

    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        Ok(vec![])
    }

    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        Ok(vec![])
    }

    async fn salon_services(
        &self,
        _salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        Ok(vec![])
    }
}

struct DownSource;

#[async_trait]
impl SalonSource for DownSource {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn salons_near(
        &self,
        _center: Coordinate,
        _radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        Err(ClientError::TimedOut {
            url: "http://backend/saloons/map".to_owned(),
        })
    }

    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        unreachable!("unfiltered list must not be requested after an error")
    }

    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        Ok(vec![])
    }

    async fn salon_services(
        &self,
        _salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        Ok(vec![])
    }
}

/// Salon endpoints fail but the catalog still answers.
struct SalonsDownCatalogUp {
    catalog_calls: AtomicUsize,
}

#[async_trait]
impl SalonSource for SalonsDownCatalogUp {
    fn name(&self) -> &'static str {
        "salons-down"
    }

    async fn salons_near(
        &self,
        _center: Coordinate,
        _radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        Err(ClientError::TimedOut {
            url: "http://backend/saloons/map".to_owned(),
        })
    }

    async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        Err(ClientError::TimedOut {
            url: "http://backend/saloons/map".to_owned(),
        })
    }

    async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Service {
            id: salonmap_core::ServiceId::new("live-only"),
            name: "Live Only Botox".to_owned(),
            description: None,
            category: None,
            parent_service: None,
            work_types: vec![],
        }])
    }

    async fn salon_services(
        &self,
        _salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn newer_refresh_supersedes_in_flight_one() {
    let source = Arc::new(GatedSource {
        calls: AtomicUsize::new(0),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let session = Arc::new(session(Arc::clone(&source) as Arc<dyn SalonSource>));

    let first = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.refresh().await }
    });
    source.entered.notified().await;

    let second = session.refresh().await.expect("second refresh loads");
    assert!(matches!(second, RefreshOutcome::Loaded(_)));

    source.release.notify_one();
    let first = first.await.expect("task joins").expect("superseded is not an error");
    assert_eq!(first, RefreshOutcome::Superseded);

    let ids: Vec<String> = session
        .salons()
        .await
        .into_iter()
        .map(|s| s.id.to_string())
        .collect();
    assert_eq!(ids, vec!["new"]);
}

#[tokio::test]
async fn refresh_with_denied_location_uses_fallback_and_loads() {
    let session = session(Arc::new(DemoSalonSource::builtin().expect("seed parses")));

    let outcome = session.refresh().await.expect("demo source never fails");
    let RefreshOutcome::Loaded(summary) = outcome else {
        panic!("expected a load, got {outcome:?}");
    };
    assert_eq!(summary.fix.coordinate, HELSINKI);
    assert_eq!(summary.fix.notice(), Some("could not get your location"));
    assert_eq!(summary.provenance, Provenance::Nearby);
    assert!(summary.salon_count > 0);
    assert!(summary.service_count > 0);
    assert_eq!(session.last_load().await, Some(summary));
    assert_eq!(
        session.with_controller(|c| c.state()).await,
        SyncState::Ready
    );
}

#[tokio::test]
async fn failed_load_reports_user_message() {
    let session = session(Arc::new(DownSource));
    let err = session.refresh().await.expect_err("no seed configured");
    assert!(matches!(err, DiscoveryError::Load(_)));
    assert_eq!(err.user_message(), "could not load salons");
    assert!(session.salons().await.is_empty());
}

#[tokio::test]
async fn seed_load_indexes_seed_services_not_live_catalog() {
    let source = Arc::new(SalonsDownCatalogUp {
        catalog_calls: AtomicUsize::new(0),
    });
    let seed = DemoSalonSource::builtin().expect("seed parses");
    let mut expected: Vec<String> = seed.services().into_iter().map(|s| s.name).collect();
    expected.sort();
    let session = DiscoverySession::new(
        denied_location(),
        SalonRepository::new(Arc::clone(&source) as Arc<dyn SalonSource>).with_seed(seed),
        MapSyncController::new(Duration::from_millis(500)),
        Some(10.0),
    );

    let RefreshOutcome::Loaded(summary) = session.refresh().await.expect("seed covers failure")
    else {
        panic!("expected a load");
    };
    assert_eq!(summary.provenance, Provenance::Seed);
    assert_eq!(source.catalog_calls.load(Ordering::SeqCst), 0);

    let mut names: Vec<String> = session
        .search("")
        .await
        .services
        .into_iter()
        .map(|s| s.name)
        .collect();
    names.sort();
    assert_eq!(names, expected);
    assert!(!names.iter().any(|n| n == "Live Only Botox"));
}

#[tokio::test]
async fn search_ranks_loaded_salons() {
    let source = Arc::new(DemoSalonSource::from_salons(vec![
        salon("a", "Anna's Studio", "Mannerheimintie 1"),
        salon("b", "Beauty Spot", "Esplanadi 2"),
    ]));
    let session = session(source);
    session.refresh().await.expect("loads");

    let results = session.search("ann").await;
    let hits: Vec<(&str, u32)> = results
        .salons
        .iter()
        .map(|r| (r.salon.id.as_str(), r.score))
        .collect();
    assert_eq!(hits, vec![("a", 3)]);
}

#[tokio::test]
async fn search_pick_focuses_and_syncs_carousel() {
    let source = Arc::new(DemoSalonSource::from_salons(vec![
        salon("a", "Anna's Studio", "Mannerheimintie 1"),
        salon("b", "Beauty Spot", "Esplanadi 2"),
    ]));
    let session = session(source);
    session.refresh().await.expect("loads");

    let results = session.search("beauty").await;
    let picked = results.salons[0].salon.clone();
    let commands = session.pick_search_result(&picked).await;

    assert!(commands.contains(&SurfaceCommand::CloseSearch));
    assert!(commands.contains(&SurfaceCommand::ScrollToCard { index: 1 }));
    assert_eq!(
        session.with_controller(|c| c.state()).await,
        SyncState::Focused(SalonId::new("b"))
    );

    let commands = session
        .handle_message(r#"{"type":"markerPress","salonId":"a"}"#)
        .await;
    assert_eq!(commands, vec![SurfaceCommand::ScrollToCard { index: 0 }]);
}
