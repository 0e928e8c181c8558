//! Deduplicated view of the services offered by a set of salons.

use std::collections::HashMap;

use salonmap_core::{Salon, Service, ServiceId};

/// Services keyed by id, kept in first-seen order.
///
/// When the same service id appears more than once, the first occurrence
/// wins; later duplicates are dropped even if their name or description
/// differs. Prices live on the salon-specific offering and never reach the
/// index.
#[derive(Debug, Clone, Default)]
pub struct ServiceIndex {
    services: Vec<Service>,
    positions: HashMap<ServiceId, usize>,
}

impl ServiceIndex {
    /// Flattens every salon's offerings into an index, walking salons and
    /// their offerings in list order.
    #[must_use]
    pub fn build(salons: &[Salon]) -> Self {
        let index = Self::from_services(
            salons
                .iter()
                .flat_map(|salon| salon.services.iter().map(|o| o.service.clone())),
        );
        tracing::debug!(
            salons = salons.len(),
            services = index.len(),
            "built service index from salon offerings"
        );
        index
    }

    /// Builds an index from a dedicated catalog listing, with the same
    /// first-seen deduplication as [`ServiceIndex::build`].
    #[must_use]
    pub fn from_services(services: impl IntoIterator<Item = Service>) -> Self {
        let mut index = Self::default();
        for service in services {
            index.insert(service);
        }
        index
    }

    /// Inserts `service` unless its id is already present. Returns `true` if
    /// it was inserted.
    pub fn insert(&mut self, service: Service) -> bool {
        if self.positions.contains_key(&service.id) {
            return false;
        }
        self.positions
            .insert(service.id.clone(), self.services.len());
        self.services.push(service);
        true
    }

    #[must_use]
    pub fn get(&self, id: &ServiceId) -> Option<&Service> {
        self.positions.get(id).map(|&i| &self.services[i])
    }

    #[must_use]
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.positions.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Services in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    /// Services grouped under `parent` via their `parent_service` link.
    pub fn children_of<'a>(&'a self, parent: &'a ServiceId) -> impl Iterator<Item = &'a Service> {
        self.services
            .iter()
            .filter(move |s| s.parent_service.as_ref() == Some(parent))
    }
}

impl<'a> IntoIterator for &'a ServiceIndex {
    type Item = &'a Service;
    type IntoIter = std::slice::Iter<'a, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.services.iter()
    }
}
