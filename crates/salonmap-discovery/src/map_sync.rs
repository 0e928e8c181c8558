//! Keeps the map viewport and the salon card carousel pointing at the same
//! salon.
//!
//! The controller owns the loaded salon list, the active card index, and the
//! active salon id. Every selection source (marker tap, card scroll, search
//! pick) goes through one transition method that returns the commands the
//! render surface must run. Selections are last-writer-wins: there is no
//! arbitration beyond the order in which events are handled.

use std::time::Duration;

use salonmap_core::{AppConfig, Salon, SalonId};

use crate::surface::{SurfaceCommand, SurfaceEvent};

/// Fraction of a card that must be on screen for it to count as viewed.
pub const VIEWABILITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    /// No salons loaded.
    Idle,
    /// Salons loaded, nothing explicitly selected.
    Ready,
    /// A salon is the active selection.
    Focused(SalonId),
}

/// One carousel item as reported by the surface's viewability callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewableItem {
    pub index: usize,
    /// 0.0–1.0.
    pub visible_fraction: f64,
}

#[derive(Debug, Clone)]
pub struct MapSyncController {
    salons: Vec<Salon>,
    active_card_index: usize,
    active_salon_id: Option<SalonId>,
    fly_to: Duration,
}

impl MapSyncController {
    #[must_use]
    pub fn new(fly_to: Duration) -> Self {
        Self {
            salons: Vec::new(),
            active_card_index: 0,
            active_salon_id: None,
            fly_to,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.fly_to_duration())
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        match (&self.active_salon_id, self.salons.is_empty()) {
            (Some(id), _) => SyncState::Focused(id.clone()),
            (None, true) => SyncState::Idle,
            (None, false) => SyncState::Ready,
        }
    }

    #[must_use]
    pub fn salons(&self) -> &[Salon] {
        &self.salons
    }

    #[must_use]
    pub fn active_card_index(&self) -> usize {
        self.active_card_index
    }

    #[must_use]
    pub fn active_salon_id(&self) -> Option<&SalonId> {
        self.active_salon_id.as_ref()
    }

    #[must_use]
    pub fn active_salon(&self) -> Option<&Salon> {
        let id = self.active_salon_id.as_ref()?;
        self.salons.iter().find(|s| &s.id == id)
    }

    /// Replaces the salon list. A non-empty list resets to `Ready` with the
    /// first card active; an empty list returns to `Idle`.
    pub fn load_salons(&mut self, salons: Vec<Salon>) {
        self.salons = salons;
        self.active_card_index = 0;
        self.active_salon_id = None;
        tracing::debug!(count = self.salons.len(), "map sync list replaced");
    }

    /// Marker tap. Focuses `salon_id` and scrolls the carousel to its card
    /// when that is not already the active card. Unknown ids are ignored.
    pub fn select_from_marker(&mut self, salon_id: &SalonId) -> Vec<SurfaceCommand> {
        let Some(index) = self.position_of(salon_id) else {
            tracing::debug!(%salon_id, "marker press for a salon not in the list");
            return Vec::new();
        };

        self.active_salon_id = Some(salon_id.clone());
        if index == self.active_card_index {
            return Vec::new();
        }
        self.active_card_index = index;
        vec![SurfaceCommand::ScrollToCard { index }]
    }

    /// Carousel settled on `index`. Focuses that salon and flies the map to
    /// it. Out-of-range indexes are ignored.
    pub fn select_from_card_scroll(&mut self, index: usize) -> Vec<SurfaceCommand> {
        let Some(salon) = self.salons.get(index) else {
            tracing::debug!(index, count = self.salons.len(), "card index out of range");
            return Vec::new();
        };

        let command = SurfaceCommand::fly_to(salon.coordinate, self.fly_to);
        self.active_salon_id = Some(salon.id.clone());
        self.active_card_index = index;
        vec![command]
    }

    /// Search pick. Flies the map to `salon`, closes the search overlay, and
    /// scrolls the carousel when the salon is in the loaded list.
    pub fn select_from_search_result(&mut self, salon: &Salon) -> Vec<SurfaceCommand> {
        let mut commands = vec![
            SurfaceCommand::fly_to(salon.coordinate, self.fly_to),
            SurfaceCommand::CloseSearch,
        ];
        self.active_salon_id = Some(salon.id.clone());

        if let Some(index) = self.position_of(&salon.id) {
            if index != self.active_card_index {
                self.active_card_index = index;
                commands.push(SurfaceCommand::ScrollToCard { index });
            }
        }
        commands
    }

    /// Viewability callback: the first item at least half visible is treated
    /// as a card-scroll selection.
    pub fn on_viewable_items_changed(&mut self, items: &[ViewableItem]) -> Vec<SurfaceCommand> {
        match items
            .iter()
            .find(|item| item.visible_fraction >= VIEWABILITY_THRESHOLD)
        {
            Some(item) => self.select_from_card_scroll(item.index),
            None => Vec::new(),
        }
    }

    /// Applies one raw surface message. Malformed messages are logged and
    /// produce no commands.
    pub fn handle_message(&mut self, raw: &str) -> Vec<SurfaceCommand> {
        match SurfaceEvent::parse(raw) {
            Ok(event) => self.handle_event(event),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring surface message");
                Vec::new()
            }
        }
    }

    pub fn handle_event(&mut self, event: SurfaceEvent) -> Vec<SurfaceCommand> {
        match event {
            SurfaceEvent::MarkerPress { salon_id } => self.select_from_marker(&salon_id),
            SurfaceEvent::CardViewable { index } => self.select_from_card_scroll(index),
            SurfaceEvent::SearchPick { salon_id } => {
                match self.salons.iter().find(|s| s.id == salon_id).cloned() {
                    Some(salon) => self.select_from_search_result(&salon),
                    None => {
                        tracing::debug!(%salon_id, "search pick for a salon not in the list");
                        Vec::new()
                    }
                }
            }
            SurfaceEvent::MapReady => self
                .salons
                .get(self.active_card_index)
                .map(|s| vec![SurfaceCommand::fly_to(s.coordinate, self.fly_to)])
                .unwrap_or_default(),
        }
    }

    fn position_of(&self, salon_id: &SalonId) -> Option<usize> {
        self.salons.iter().position(|s| &s.id == salon_id)
    }
}

#[cfg(test)]
#[path = "map_sync_test.rs"]
mod tests;
