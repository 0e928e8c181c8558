//! Wire shapes accepted from the booking backend.
//!
//! The backend is loose about field naming (camelCase with occasional
//! snake_case), id types (string or integer), and number encoding (JSON
//! number or numeric string). These types accept every observed variant;
//! [`crate::normalize`] turns them into the canonical `salonmap_core` types
//! and is the only place that interprets them.

use serde::Deserialize;

/// An identifier sent either as a JSON string or an integer.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WireId {
    Int(i64),
    Text(String),
}

impl WireId {
    /// Canonical string form. Returns `None` for blank string ids.
    #[must_use]
    pub fn into_canonical(self) -> Option<String> {
        match self {
            WireId::Int(n) => Some(n.to_string()),
            WireId::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            }
        }
    }
}

/// A number sent either as a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum WireNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl WireNumber {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            WireNumber::Int(n) => Some(*n as f64),
            WireNumber::Float(f) => Some(*f),
            WireNumber::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|f| f.is_finite())
    }
}

/// A salon record as returned by `GET /saloons/map`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalonWire {
    pub id: Option<WireId>,
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "lat")]
    pub latitude: Option<WireNumber>,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: Option<WireNumber>,
    #[serde(alias = "average_rating")]
    pub average_rating: Option<WireNumber>,
    /// Legacy rating field, used when `averageRating` is absent.
    pub rating: Option<WireNumber>,
    #[serde(alias = "review_count")]
    pub review_count: Option<WireNumber>,
    pub images: Option<Vec<String>>,
    #[serde(alias = "saloon_services")]
    pub saloon_services: Option<Vec<OfferingWire>>,
}

/// One `saloonServices[]` entry: the salon-specific binding of a service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferingWire {
    pub price: Option<WireNumber>,
    #[serde(alias = "duration_minutes", alias = "duration")]
    pub duration_minutes: Option<WireNumber>,
    #[serde(alias = "is_available")]
    pub is_available: Option<bool>,
    pub service: Option<ServiceWire>,
}

/// A service record. The per-salon services endpoint inlines price,
/// duration, and availability next to the catalog fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceWire {
    pub id: Option<WireId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<CategoryWire>,
    #[serde(alias = "parent_service")]
    pub parent_service: Option<ParentWire>,
    #[serde(alias = "work_types")]
    pub work_types: Option<Vec<WorkTypeWire>>,
    pub price: Option<WireNumber>,
    #[serde(alias = "duration_minutes", alias = "duration")]
    pub duration_minutes: Option<WireNumber>,
    #[serde(alias = "is_available")]
    pub is_available: Option<bool>,
}

/// A category reference: either an embedded object or a bare id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryWire {
    Object { id: WireId, name: Option<String> },
    Id(WireId),
}

/// A parent-service reference: either an embedded object or a bare id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParentWire {
    Object { id: WireId },
    Id(WireId),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTypeWire {
    pub id: Option<WireId>,
    pub name: Option<String>,
    pub price: Option<WireNumber>,
    #[serde(alias = "duration_minutes", alias = "duration")]
    pub duration_minutes: Option<WireNumber>,
}

/// Body of `GET /public/saloons/{id}/available-slots`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsWire {
    #[serde(default, alias = "is_closed")]
    pub is_closed: bool,
    pub message: Option<String>,
    #[serde(default, alias = "available_slots")]
    pub available_slots: Vec<SlotWire>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlotWire {
    /// `"HH:MM"`.
    pub time: String,
}
