use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Bookable start times for one service at one salon on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlots {
    pub date: NaiveDate,
    /// `true` when the salon is closed for the whole day.
    pub is_closed: bool,
    /// Backend-provided explanation, typically present when closed.
    pub message: Option<String>,
    /// Start times in ascending order.
    pub slots: Vec<NaiveTime>,
}

impl AvailableSlots {
    /// Returns `true` if at least one slot can be booked.
    #[must_use]
    pub fn has_availability(&self) -> bool {
        !self.is_closed && !self.slots.is_empty()
    }
}
