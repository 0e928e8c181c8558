//! HTTP client for the booking backend's public salon endpoints.
//!
//! Wraps `reqwest` with a bounded per-request timeout, retry on transient
//! errors, and the decoding boundary in [`crate::normalize`]. Non-2xx bodies
//! are read as text and logged for diagnostics.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use salonmap_core::{
    AppConfig, AvailableSlots, Coordinate, Salon, SalonId, SalonServiceDetail, Service, ServiceId,
};

use crate::error::ClientError;
use crate::normalize::{decode_salon_list, decode_salon_services, decode_service_list, decode_slots};
use crate::retry::retry_with_backoff;

/// Longest slice of a non-2xx body kept in errors and logs.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the booking backend.
///
/// Use [`BookingApiClient::from_config`] in the application or
/// [`BookingApiClient::new`] to point at a mock server in tests.
pub struct BookingApiClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl BookingApiClient {
    /// Creates a client for `base_url` (e.g. `"https://api.example.com/api"`).
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for transient errors; `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so endpoint segments append to the base
        // path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "expected an absolute http(s) URL".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`BookingApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /saloons/map?lat=&lng=[&radius=]`: salons around `center`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::TimedOut`] / [`ClientError::Http`] on transport
    ///   failure after retries.
    /// - [`ClientError::UnexpectedStatus`] / [`ClientError::NotFound`] on
    ///   non-2xx responses.
    /// - [`ClientError::Deserialize`] / [`ClientError::InvalidShape`] if the
    ///   body is not an accepted salon list shape.
    pub async fn salons_near(
        &self,
        center: Coordinate,
        radius_km: Option<f64>,
    ) -> Result<Vec<Salon>, ClientError> {
        let mut query = vec![
            ("lat", center.latitude.to_string()),
            ("lng", center.longitude.to_string()),
        ];
        if let Some(radius) = radius_km {
            query.push(("radius", radius.to_string()));
        }
        let url = self.endpoint(&["saloons", "map"], &query);
        let body = self.get_text(&url).await?;
        decode_salon_list(&body, &format!("saloons near {center}"))
    }

    /// `GET /saloons/map`: every salon, unfiltered.
    ///
    /// # Errors
    ///
    /// Same as [`BookingApiClient::salons_near`].
    pub async fn all_salons(&self) -> Result<Vec<Salon>, ClientError> {
        let url = self.endpoint(&["saloons", "map"], &[]);
        let body = self.get_text(&url).await?;
        decode_salon_list(&body, "all saloons")
    }

    /// `GET /public/services`: the dedicated service catalog.
    ///
    /// # Errors
    ///
    /// Same as [`BookingApiClient::salons_near`].
    pub async fn service_catalog(&self) -> Result<Vec<Service>, ClientError> {
        let url = self.endpoint(&["public", "services"], &[]);
        let body = self.get_text(&url).await?;
        decode_service_list(&body, "service catalog")
    }

    /// `GET /public/saloons/{salonId}/services`.
    ///
    /// # Errors
    ///
    /// Same as [`BookingApiClient::salons_near`].
    pub async fn salon_services(
        &self,
        salon_id: &SalonId,
    ) -> Result<Vec<SalonServiceDetail>, ClientError> {
        let url = self.endpoint(&["public", "saloons", salon_id.as_str(), "services"], &[]);
        let body = self.get_text(&url).await?;
        decode_salon_services(&body, &format!("services of saloon {salon_id}"))
    }

    /// `GET /public/saloons/{salonId}/available-slots?serviceId=&date=YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Same as [`BookingApiClient::salons_near`].
    pub async fn available_slots(
        &self,
        salon_id: &SalonId,
        service_id: &ServiceId,
        date: NaiveDate,
    ) -> Result<AvailableSlots, ClientError> {
        let url = self.endpoint(
            &["public", "saloons", salon_id.as_str(), "available-slots"],
            &[
                ("serviceId", service_id.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
            ],
        );
        let body = self.get_text(&url).await?;
        decode_slots(
            &body,
            date,
            &format!("slots of saloon {salon_id} service {service_id} on {date}"),
        )
    }

    /// Builds an endpoint URL under the base path. Segments are
    /// percent-encoded; query values are form-encoded.
    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET with retry, asserts a 2xx status, and returns the body.
    async fn get_text(&self, url: &Url) -> Result<String, ClientError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| ClientError::from_transport(e, url))?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                return Err(ClientError::NotFound {
                    url: url.to_string(),
                });
            }

            if !status.is_success() {
                let retry_after = parse_retry_after(response.headers());
                let body = response.text().await.unwrap_or_default();
                let body = truncate_chars(&body, MAX_ERROR_BODY_CHARS);
                tracing::warn!(
                    url = %url,
                    status = status.as_u16(),
                    body = %body,
                    "backend returned non-success status"
                );
                return Err(ClientError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                    body,
                    retry_after,
                });
            }

            response
                .text()
                .await
                .map_err(|e| ClientError::from_transport(e, url))
        })
        .await
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_owned(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
