use std::time::Duration;

use thiserror::Error;

/// Errors returned by the booking backend client and the wire decoding
/// boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The per-request timeout elapsed before the backend answered.
    #[error("request to {url} timed out")]
    TimedOut { url: String },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    /// Any other non-2xx status. `body` holds the (truncated) response text
    /// for diagnostics; `retry_after` is the backend's `Retry-After` hint.
    #[error("unexpected HTTP status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
        retry_after: Option<Duration>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body parsed but is not one of the accepted shapes, or a record is
    /// missing a required field.
    #[error("unexpected response shape for {context}: {reason}")]
    InvalidShape { context: String, reason: String },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// Classifies a transport error, folding client-side timeouts into
    /// [`ClientError::TimedOut`].
    pub(crate) fn from_transport(err: reqwest::Error, url: &reqwest::Url) -> Self {
        if err.is_timeout() {
            ClientError::TimedOut {
                url: url.to_string(),
            }
        } else {
            ClientError::Http(err)
        }
    }

    /// The request URL, when the error is tied to one.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::TimedOut { url }
            | ClientError::NotFound { url }
            | ClientError::UnexpectedStatus { url, .. } => Some(url),
            ClientError::Http(e) => e.url().map(reqwest::Url::as_str),
            ClientError::Deserialize { .. }
            | ClientError::InvalidShape { .. }
            | ClientError::InvalidBaseUrl { .. } => None,
        }
    }

    pub(crate) fn invalid_shape(context: impl Into<String>, reason: impl Into<String>) -> Self {
        ClientError::InvalidShape {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
