//! Bounded per-page retry for transient failures.
//!
//! A failed page normally ends the collection with whatever was gathered so
//! far. [`PageRetryPolicy`] optionally gives a page a few more attempts first,
//! but only when the failure is [`FailureType::Transient`]: a quota
//! rejection or a malformed body will not improve by asking again.

use tracing::debug;

use crate::api::ApiError;

/// Default number of extra attempts per page (none: give up on first error).
pub const DEFAULT_PAGE_RETRIES: u32 = 0;

/// Upper bound accepted for configured retries.
pub const MAX_PAGE_RETRIES: u32 = 5;

/// Classification of a page failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Network failure or 5xx; may succeed on another attempt.
    Transient,
    /// Hourly quota used up; further requests will be rejected until reset.
    QuotaExhausted,
    /// Anything else (4xx, malformed body).
    Permanent,
}

/// Classifies an [`ApiError`] into a [`FailureType`].
#[must_use]
pub fn classify_error(error: &ApiError) -> FailureType {
    if error.is_quota_exhausted() {
        FailureType::QuotaExhausted
    } else if error.is_transient() {
        FailureType::Transient
    } else {
        FailureType::Permanent
    }
}

/// Decision on whether to request the same page again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Request the page again; `attempt` is the 1-indexed attempt about to run.
    Retry {
        /// Attempt number of the next request.
        attempt: u32,
    },
    /// Give up on the page.
    DoNotRetry {
        /// Human-readable reason, for logs.
        reason: String,
    },
}

/// How many extra attempts a single page gets before the collection stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRetryPolicy {
    max_retries: u32,
}

impl Default for PageRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_PAGE_RETRIES,
        }
    }
}

impl PageRetryPolicy {
    /// Creates a policy allowing `max_retries` extra attempts, capped at [`MAX_PAGE_RETRIES`].
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.min(MAX_PAGE_RETRIES),
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self { max_retries: 0 }
    }

    /// Returns the configured number of extra attempts.
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decides whether to retry after `attempts_made` attempts (1-indexed) ended in `failure`.
    #[must_use]
    pub fn should_retry(&self, failure: FailureType, attempts_made: u32) -> RetryDecision {
        if failure != FailureType::Transient {
            return RetryDecision::DoNotRetry {
                reason: format!("{failure:?} failure is not retried"),
            };
        }
        if attempts_made > self.max_retries {
            return RetryDecision::DoNotRetry {
                reason: format!("retry budget exhausted after {attempts_made} attempt(s)"),
            };
        }
        debug!(attempt = attempts_made + 1, "retrying page");
        RetryDecision::Retry {
            attempt: attempts_made + 1,
        }
    }
}
