//! The decoding boundary: wire shapes in, canonical `salonmap_core` types out.
//!
//! Every backend body and every seed file passes through here exactly once.
//! Truly unexpected shapes fail with [`ClientError::InvalidShape`] or
//! [`ClientError::Deserialize`]; salons without a usable coordinate pair are
//! dropped (they cannot be placed on a map) rather than treated as errors.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use salonmap_core::{
    AvailableSlots, CategoryRef, Coordinate, Salon, SalonId, SalonServiceDetail, Service,
    ServiceId, ServiceOffering, WorkType,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{
    CategoryWire, OfferingWire, ParentWire, SalonWire, ServiceWire, SlotsWire, WireId, WireNumber,
    WorkTypeWire,
};

/// Envelope keys under which list endpoints have been seen to nest their
/// arrays.
const LIST_ENVELOPE_KEYS: [&str; 3] = ["data", "saloons", "salons"];

const MAX_RATING: f64 = 5.0;

/// Decodes a salon list body: a bare JSON array or an object envelope
/// (`{"data": [...]}`, `{"saloons": [...]}`). Salons without a valid
/// coordinate pair are omitted.
///
/// # Errors
///
/// - [`ClientError::Deserialize`] if the body is not JSON or an element does
///   not match the salon wire shape.
/// - [`ClientError::InvalidShape`] if the body is not a list, or a salon is
///   missing a required field.
pub fn decode_salon_list(body: &str, context: &str) -> Result<Vec<Salon>, ClientError> {
    let wires: Vec<SalonWire> = decode_list(body, context, "salon")?;
    normalize_salons(wires, context)
}

/// Normalizes already-deserialized salon records, dropping the ones that
/// cannot be placed on a map.
///
/// # Errors
///
/// Returns [`ClientError::InvalidShape`] if a salon or one of its offerings
/// is missing a required field or carries an invalid value.
pub fn normalize_salons(wires: Vec<SalonWire>, context: &str) -> Result<Vec<Salon>, ClientError> {
    let total = wires.len();
    let mut salons = Vec::with_capacity(total);
    for (i, wire) in wires.into_iter().enumerate() {
        if let Some(salon) = normalize_salon(wire, &format!("{context} salon[{i}]"))? {
            salons.push(salon);
        }
    }
    if salons.len() < total {
        tracing::debug!(
            context,
            total,
            kept = salons.len(),
            "dropped salons without a valid coordinate pair"
        );
    }
    Ok(salons)
}

/// Decodes a service catalog body into canonical services.
///
/// # Errors
///
/// Same as [`decode_salon_list`].
pub fn decode_service_list(body: &str, context: &str) -> Result<Vec<Service>, ClientError> {
    let wires: Vec<ServiceWire> = decode_list(body, context, "service")?;
    wires
        .into_iter()
        .enumerate()
        .map(|(i, wire)| normalize_service(wire, &format!("{context} service[{i}]")))
        .collect()
}

/// Decodes the per-salon services body, keeping the salon-specific price,
/// duration, and availability next to each service.
///
/// # Errors
///
/// Same as [`decode_salon_list`].
pub fn decode_salon_services(
    body: &str,
    context: &str,
) -> Result<Vec<SalonServiceDetail>, ClientError> {
    let wires: Vec<ServiceWire> = decode_list(body, context, "service")?;
    wires
        .into_iter()
        .enumerate()
        .map(|(i, wire)| {
            let ctx = format!("{context} service[{i}]");
            let price = wire
                .price
                .as_ref()
                .map(|p| parse_price(p, &ctx))
                .transpose()?;
            let duration_minutes = wire
                .duration_minutes
                .as_ref()
                .map(|d| parse_duration(d, &ctx))
                .transpose()?;
            let is_available = wire.is_available.unwrap_or(true);
            Ok(SalonServiceDetail {
                service: normalize_service(wire, &ctx)?,
                price,
                duration_minutes,
                is_available,
            })
        })
        .collect()
}

/// Decodes an available-slots body for `date`. Slot times are returned in
/// ascending order without duplicates.
///
/// # Errors
///
/// - [`ClientError::Deserialize`] if the body does not match the slots shape.
/// - [`ClientError::InvalidShape`] if a slot time is not `HH:MM`.
pub fn decode_slots(
    body: &str,
    date: NaiveDate,
    context: &str,
) -> Result<AvailableSlots, ClientError> {
    let wire: SlotsWire = serde_json::from_str(body).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })?;

    let mut slots = wire
        .available_slots
        .iter()
        .map(|slot| {
            NaiveTime::parse_from_str(slot.time.trim(), "%H:%M").map_err(|e| {
                ClientError::invalid_shape(
                    context,
                    format!("slot time \"{}\" is not HH:MM: {e}", slot.time),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    slots.sort();
    slots.dedup();

    Ok(AvailableSlots {
        date,
        is_closed: wire.is_closed,
        message: wire.message.filter(|m| !m.trim().is_empty()),
        slots,
    })
}

/// Extracts the list from a bare array or a known envelope, then
/// deserializes each element with its index in the error context.
fn decode_list<T: DeserializeOwned>(
    body: &str,
    context: &str,
    item: &str,
) -> Result<Vec<T>, ClientError> {
    let value: Value = serde_json::from_str(body).map_err(|e| ClientError::Deserialize {
        context: context.to_owned(),
        source: e,
    })?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => LIST_ENVELOPE_KEYS
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(items)) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                ClientError::invalid_shape(
                    context,
                    "expected a JSON array or an object with a \"data\"/\"saloons\" array",
                )
            })?,
        other => {
            return Err(ClientError::invalid_shape(
                context,
                format!("expected a JSON array, got {}", json_kind(&other)),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value(v).map_err(|e| ClientError::Deserialize {
                context: format!("{context} {item}[{i}]"),
                source: e,
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Returns `Ok(None)` when the salon has no placeable coordinate.
fn normalize_salon(wire: SalonWire, context: &str) -> Result<Option<Salon>, ClientError> {
    let id = require_id(wire.id, context)?;
    let name = require_name(wire.name, context)?;

    let Some(coordinate) = Coordinate::from_parts(
        wire.latitude.as_ref().and_then(WireNumber::as_f64),
        wire.longitude.as_ref().and_then(WireNumber::as_f64),
    ) else {
        tracing::debug!(context, salon_id = %id, "salon has no valid coordinate pair");
        return Ok(None);
    };

    let average_rating = wire
        .average_rating
        .as_ref()
        .or(wire.rating.as_ref())
        .and_then(WireNumber::as_f64)
        .map_or(0.0, |r| r.clamp(0.0, MAX_RATING));

    let review_count = match wire.review_count.as_ref() {
        None => 0,
        Some(n) => parse_count(n).ok_or_else(|| {
            ClientError::invalid_shape(context, "reviewCount is not a non-negative integer")
        })?,
    };

    let images = wire
        .images
        .unwrap_or_default()
        .into_iter()
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .collect();

    let services = wire
        .saloon_services
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, o)| normalize_offering(o, &format!("{context} saloonServices[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(Salon {
        id: SalonId::new(id),
        name,
        address: wire
            .address
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty()),
        coordinate,
        average_rating,
        review_count,
        images,
        services,
    }))
}

fn normalize_offering(wire: OfferingWire, context: &str) -> Result<ServiceOffering, ClientError> {
    let service = wire
        .service
        .ok_or_else(|| ClientError::invalid_shape(context, "offering has no nested service"))?;
    let price = wire
        .price
        .as_ref()
        .or(service.price.as_ref())
        .ok_or_else(|| ClientError::invalid_shape(context, "offering has no price"))
        .and_then(|p| parse_price(p, context))?;
    let duration_minutes = wire
        .duration_minutes
        .as_ref()
        .or(service.duration_minutes.as_ref())
        .ok_or_else(|| ClientError::invalid_shape(context, "offering has no duration"))
        .and_then(|d| parse_duration(d, context))?;

    Ok(ServiceOffering {
        service: normalize_service(service, &format!("{context}.service"))?,
        price,
        duration_minutes,
        is_available: wire.is_available.unwrap_or(true),
    })
}

fn normalize_service(wire: ServiceWire, context: &str) -> Result<Service, ClientError> {
    let id = require_id(wire.id, context)?;
    let name = require_name(wire.name, context)?;

    let category = match wire.category {
        None => None,
        Some(CategoryWire::Object { id, name }) => Some(CategoryRef {
            id: require_id(Some(id), context)?,
            name: name.filter(|n| !n.trim().is_empty()),
        }),
        Some(CategoryWire::Id(id)) => Some(CategoryRef {
            id: require_id(Some(id), context)?,
            name: None,
        }),
    };

    let parent_service = match wire.parent_service {
        None => None,
        Some(ParentWire::Object { id } | ParentWire::Id(id)) => {
            Some(ServiceId::new(require_id(Some(id), context)?))
        }
    };

    let work_types = wire
        .work_types
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, w)| normalize_work_type(w, &format!("{context} workTypes[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Service {
        id: ServiceId::new(id),
        name,
        description: wire.description.filter(|d| !d.trim().is_empty()),
        category,
        parent_service,
        work_types,
    })
}

fn normalize_work_type(wire: WorkTypeWire, context: &str) -> Result<WorkType, ClientError> {
    Ok(WorkType {
        id: require_id(wire.id, context)?,
        name: require_name(wire.name, context)?,
        price: wire
            .price
            .as_ref()
            .map(|p| parse_price(p, context))
            .transpose()?,
        duration_minutes: wire
            .duration_minutes
            .as_ref()
            .map(|d| parse_duration(d, context))
            .transpose()?,
    })
}

fn require_id(id: Option<WireId>, context: &str) -> Result<String, ClientError> {
    id.and_then(WireId::into_canonical)
        .ok_or_else(|| ClientError::invalid_shape(context, "missing id"))
}

fn require_name(name: Option<String>, context: &str) -> Result<String, ClientError> {
    name.map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ClientError::invalid_shape(context, "missing name"))
}

/// Non-negative currency amount.
fn parse_price(value: &WireNumber, context: &str) -> Result<Decimal, ClientError> {
    let price = match value {
        WireNumber::Int(n) => Some(Decimal::from(*n)),
        WireNumber::Float(f) => Decimal::try_from(*f).ok(),
        WireNumber::Text(s) => Decimal::from_str(s.trim()).ok(),
    }
    .ok_or_else(|| ClientError::invalid_shape(context, format!("price {value:?} is not a number")))?;

    if price.is_sign_negative() && !price.is_zero() {
        return Err(ClientError::invalid_shape(
            context,
            format!("price {price} is negative"),
        ));
    }
    Ok(price)
}

/// Positive whole minutes.
fn parse_duration(value: &WireNumber, context: &str) -> Result<u32, ClientError> {
    parse_count(value)
        .filter(|&m| m > 0)
        .ok_or_else(|| {
            ClientError::invalid_shape(
                context,
                format!("duration {value:?} is not a positive whole number of minutes"),
            )
        })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(value: &WireNumber) -> Option<u32> {
    match value {
        WireNumber::Int(n) => u32::try_from(*n).ok(),
        WireNumber::Float(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f) => {
            Some(*f as u32)
        }
        WireNumber::Float(_) => None,
        WireNumber::Text(s) => s.trim().parse::<u32>().ok(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
