//! Messages exchanged with the map render surface.
//!
//! Inbound messages arrive as JSON text tagged by `"type"`; outbound
//! commands serialize the same way.

use std::time::Duration;

use salonmap_core::{Coordinate, SalonId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An event reported by the render surface.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceEvent {
    /// A map marker was tapped.
    MarkerPress {
        #[serde(rename = "salonId")]
        salon_id: SalonId,
    },
    /// The card carousel settled on a new item.
    CardViewable { index: usize },
    /// A search result was picked.
    SearchPick {
        #[serde(rename = "salonId")]
        salon_id: SalonId,
    },
    /// The map finished loading and can receive commands.
    MapReady,
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("malformed surface message: {source}")]
    Malformed {
        #[from]
        source: serde_json::Error,
    },
}

impl SurfaceEvent {
    /// Parses one message from the surface.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Malformed`] if `raw` is not JSON or has an
    /// unknown `type` or missing fields.
    pub fn parse(raw: &str) -> Result<Self, SurfaceError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// A command for the render surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceCommand {
    /// Animate the map viewport to `coordinate`.
    FlyTo {
        coordinate: Coordinate,
        #[serde(rename = "durationMs")]
        duration_ms: u64,
    },
    /// Scroll the card carousel so `index` is centered.
    ScrollToCard { index: usize },
    CloseSearch,
}

impl SurfaceCommand {
    pub(crate) fn fly_to(coordinate: Coordinate, duration: Duration) -> Self {
        SurfaceCommand::FlyTo {
            coordinate,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
