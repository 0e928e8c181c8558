use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Backend-assigned salon identifier, canonicalised to a string regardless of
/// whether the backend sent a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalonId(String);

/// Backend-assigned service identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

macro_rules! string_id {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $ty {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $ty {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(SalonId);
string_id!(ServiceId);

/// A bookable business location that can be placed on the map.
///
/// Only salons with a valid coordinate pair are ever constructed by the
/// decoding layer, so `coordinate` is not optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salon {
    pub id: SalonId,
    pub name: String,
    pub address: Option<String>,
    pub coordinate: Coordinate,
    /// 0.0–5.0.
    pub average_rating: f64,
    pub review_count: u32,
    /// Image URLs; the first one is the card thumbnail.
    pub images: Vec<String>,
    pub services: Vec<ServiceOffering>,
}

impl Salon {
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    /// Offerings that may be used in a booking path.
    pub fn bookable_offerings(&self) -> impl Iterator<Item = &ServiceOffering> {
        self.services.iter().filter(|o| o.is_available)
    }

    /// Looks up the bookable offering for `service_id`, if this salon has one.
    #[must_use]
    pub fn bookable_offering(&self, service_id: &ServiceId) -> Option<&ServiceOffering> {
        self.bookable_offerings()
            .find(|o| &o.service.id == service_id)
    }
}

/// The salon-specific binding of a [`Service`]: price, duration, and whether
/// it can currently be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub service: Service,
    pub price: Decimal,
    pub duration_minutes: u32,
    pub is_available: bool,
}

/// A catalog entry (treatment type) that salons can offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<CategoryRef>,
    /// Set when this service is a sub-variant grouped under another service.
    pub parent_service: Option<ServiceId>,
    /// Sub-variants (e.g. "New set" / "Removal") that branch pricing and the
    /// booking flow.
    pub work_types: Vec<WorkType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkType {
    pub id: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub duration_minutes: Option<u32>,
}

/// A service as listed by a single salon's service endpoint, with that
/// salon's pricing when the backend includes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonServiceDetail {
    pub service: Service,
    pub price: Option<Decimal>,
    pub duration_minutes: Option<u32>,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(id: &str, name: &str) -> Service {
        Service {
            id: ServiceId::new(id),
            name: name.to_string(),
            description: None,
            category: None,
            parent_service: None,
            work_types: vec![],
        }
    }

    fn offering(id: &str, available: bool) -> ServiceOffering {
        ServiceOffering {
            service: service(id, "Gel nails"),
            price: Decimal::new(4500, 2),
            duration_minutes: 60,
            is_available: available,
        }
    }

    fn salon(services: Vec<ServiceOffering>) -> Salon {
        Salon {
            id: SalonId::new("s1"),
            name: "Nail Bar".to_string(),
            address: None,
            coordinate: Coordinate::new(60.17, 24.94),
            average_rating: 4.5,
            review_count: 10,
            images: vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()],
            services,
        }
    }

    #[test]
    fn bookable_offerings_excludes_unavailable() {
        let s = salon(vec![offering("a", true), offering("b", false)]);
        let ids: Vec<&str> = s.bookable_offerings().map(|o| o.service.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn bookable_offering_lookup_ignores_unavailable() {
        let s = salon(vec![offering("a", true), offering("b", false)]);
        assert!(s.bookable_offering(&ServiceId::new("a")).is_some());
        assert!(s.bookable_offering(&ServiceId::new("b")).is_none());
    }

    #[test]
    fn thumbnail_is_first_image() {
        let s = salon(vec![]);
        assert_eq!(s.thumbnail(), Some("https://img/1.jpg"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&SalonId::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
