//! Position acquisition with a bounded wait and a fixed fallback coordinate.
//!
//! [`LocationProvider::acquire`] never fails: permission denial, a timeout,
//! or a provider error all resolve to the configured fallback coordinate,
//! tagged with the reason so the caller can show a notice.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use salonmap_core::{AppConfig, Coordinate};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Accuracy hint passed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accuracy {
    Balanced,
}

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("position unavailable: {0}")]
    Unavailable(String),
}

/// The host platform's location service.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn request_permission(&self) -> PermissionStatus;

    async fn current_position(&self, accuracy: Accuracy) -> Result<Coordinate, PositionError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FallbackReason {
    PermissionDenied,
    TimedOut,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FixOrigin {
    Device,
    Fallback(FallbackReason),
}

/// A coordinate plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationFix {
    pub coordinate: Coordinate,
    pub origin: FixOrigin,
}

impl LocationFix {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.origin, FixOrigin::Fallback(_))
    }

    /// User-facing notice for a degraded fix.
    #[must_use]
    pub fn notice(&self) -> Option<&'static str> {
        self.is_fallback().then_some("could not get your location")
    }
}

pub struct LocationProvider {
    source: Arc<dyn PositionSource>,
    fallback: Coordinate,
    timeout: Duration,
}

impl LocationProvider {
    #[must_use]
    pub fn new(source: Arc<dyn PositionSource>, fallback: Coordinate, timeout: Duration) -> Self {
        Self {
            source,
            fallback,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(source: Arc<dyn PositionSource>, config: &AppConfig) -> Self {
        Self::new(source, config.fallback_coordinate, config.location_timeout())
    }

    #[must_use]
    pub fn fallback(&self) -> Coordinate {
        self.fallback
    }

    /// Requests permission, then waits at most the configured timeout for a
    /// position. Any failure yields the fallback coordinate.
    pub async fn acquire(&self) -> LocationFix {
        if self.source.request_permission().await == PermissionStatus::Denied {
            return self.fall_back(FallbackReason::PermissionDenied);
        }

        let attempt = tokio::time::timeout(
            self.timeout,
            self.source.current_position(Accuracy::Balanced),
        )
        .await;

        match attempt {
            Ok(Ok(coordinate)) if coordinate.is_valid() => LocationFix {
                coordinate,
                origin: FixOrigin::Device,
            },
            Ok(Ok(coordinate)) => {
                self.fall_back(FallbackReason::Failed(format!("invalid position {coordinate}")))
            }
            Ok(Err(e)) => self.fall_back(FallbackReason::Failed(e.to_string())),
            Err(_) => self.fall_back(FallbackReason::TimedOut),
        }
    }

    fn fall_back(&self, reason: FallbackReason) -> LocationFix {
        tracing::warn!(?reason, fallback = %self.fallback, "using fallback coordinate");
        LocationFix {
            coordinate: self.fallback,
            origin: FixOrigin::Fallback(reason),
        }
    }
}

/// A position source with a fixed answer; `None` behaves as a denied
/// permission. Used by the CLI and in tests.
#[derive(Debug, Clone, Copy)]
pub struct StaticPositionSource {
    position: Option<Coordinate>,
}

impl StaticPositionSource {
    #[must_use]
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }

    #[must_use]
    pub fn denied() -> Self {
        Self { position: None }
    }
}

#[async_trait]
impl PositionSource for StaticPositionSource {
    async fn request_permission(&self) -> PermissionStatus {
        if self.position.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self, _accuracy: Accuracy) -> Result<Coordinate, PositionError> {
        self.position
            .ok_or_else(|| PositionError::Unavailable("no position configured".to_owned()))
    }
}
