//! Error types for the API client.
//!
//! Every failure of a single page request lands in one of these variants.
//! The collector decides what to do with them; nothing here retries.

use thiserror::Error;

/// Fallback message when a non-200 response carries no usable `message` field.
pub const UNKNOWN_API_MESSAGE: &str = "Unknown error";

/// Errors that can occur while fetching one page from the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, TLS, timeout, body read).
    #[error("transport error requesting {url}: {source}")]
    Transport {
        /// The request URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status other than 200.
    #[error("API error (HTTP {status}) requesting {url}: {message}")]
    Http {
        /// The request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The API's own error message, or [`UNKNOWN_API_MESSAGE`].
        message: String,
        /// Whether `x-ratelimit-remaining: 0` was present on the response.
        quota_exhausted: bool,
    },

    /// A 200 response whose body was not the expected JSON array of accounts.
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        /// The request URL.
        url: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The configured API base URL could not be parsed.
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client construction failed: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl ApiError {
    /// Creates a transport error.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            status,
            message: message.into(),
            quota_exhausted: false,
        }
    }

    /// Creates an HTTP status error for a response that reported zero remaining quota.
    pub fn quota(url: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            status,
            message: message.into(),
            quota_exhausted: true,
        }
    }

    /// Creates a decode error.
    pub fn decode(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Returns the HTTP status for [`ApiError::Http`], `None` otherwise.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when the hourly request quota has been used up.
    ///
    /// The API signals this with 429, or with 403 plus either a zeroed
    /// `x-ratelimit-remaining` header or a "rate limit" message.
    #[must_use]
    pub fn is_quota_exhausted(&self) -> bool {
        match self {
            Self::Http { status: 429, .. } => true,
            Self::Http {
                status: 403,
                message,
                quota_exhausted,
                ..
            } => *quota_exhausted || message.to_ascii_lowercase().contains("rate limit"),
            _ => false,
        }
    }

    /// Returns true for failures that may succeed when the same page is requested again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
