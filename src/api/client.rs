//! Authenticated single-page requests against the social-graph API.
//!
//! [`ApiClient::fetch`] performs exactly one GET round trip and classifies the
//! outcome. It never retries; retry and give-up policy live in
//! [`crate::collect`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use super::{ApiError, Entity, Resource, UNKNOWN_API_MESSAGE};
use crate::collect::PageSource;
use crate::user_agent;

/// Default API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// `Accept` value selecting the v3 JSON API.
const ACCEPT_JSON_V3: &str = "application/vnd.github.v3+json";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Header reporting how many requests are left in the current quota window.
const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Immutable connection settings for [`ApiClient`].
#[derive(Clone)]
pub struct ApiClientConfig {
    /// Base URL of the API (scheme + host, optional path prefix).
    pub base_url: String,
    /// Bearer credential, passed through opaquely.
    pub token: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Overall per-request timeout.
    pub request_timeout: Duration,
}

impl ApiClientConfig {
    /// Creates a config for the public API with default timeouts.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            token: token.into(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }

    /// Overrides the base URL (enterprise hosts, wiremock in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides connect and request timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout: Duration, request_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.request_timeout = request_timeout;
        self
    }
}

impl std::fmt::Debug for ApiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Error payload shape returned by the API on non-200 responses.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
}

/// HTTP client for the followers/following list endpoints.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: String,
}

impl ApiClient {
    /// Builds a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for an unusable base URL and
    /// [`ApiError::ClientBuild`] when the HTTP client cannot be constructed.
    #[instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let base_url = parse_base_url(&config.base_url)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(ApiError::ClientBuild)?;

        debug!("API client constructed");
        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    /// Builds the request URL for one page of `resource`.
    ///
    /// `per_page` is clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page_url(&self, resource: &Resource, page: u32, per_page: u8) -> Url {
        let mut url = self.base_url.clone();
        let prefix = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{prefix}{}", resource.path()));
        url.set_query(None);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.clamp(1, MAX_PAGE_SIZE).to_string())
            .append_pair("page", &page.max(1).to_string());
        url
    }

    /// Fetches one page of `resource`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] when the request or body read fails
    /// - [`ApiError::Http`] for any status other than 200
    /// - [`ApiError::Decode`] when a 200 body is not an array of accounts
    #[instrument(skip(self, resource), fields(resource = %resource))]
    pub async fn fetch(
        &self,
        resource: &Resource,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Entity>, ApiError> {
        let url = self.page_url(resource, page, per_page);
        let url_text = url.to_string();
        debug!(url = %url_text, "requesting page");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_JSON_V3)
            .send()
            .await
            .map_err(|e| ApiError::transport(&url_text, e))?;

        let status = response.status();
        let remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim().to_string());
        if let Some(remaining) = &remaining {
            debug!(remaining = %remaining, "API quota remaining");
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(&url_text, e))?;

        if status != StatusCode::OK {
            let message = extract_error_message(&body);
            debug!(status = status.as_u16(), %message, "API error response");
            return Err(if remaining.as_deref() == Some("0") {
                ApiError::quota(url_text, status.as_u16(), message)
            } else {
                ApiError::http(url_text, status.as_u16(), message)
            });
        }

        let entities: Vec<Entity> =
            serde_json::from_str(&body).map_err(|e| ApiError::decode(&url_text, e))?;
        debug!(count = entities.len(), "page decoded");
        Ok(entities)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl PageSource for ApiClient {
    async fn fetch_page(
        &self,
        resource: &Resource,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Entity>, ApiError> {
        self.fetch(resource, page, per_page).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim()).map_err(|e| ApiError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an http(s) URL".to_string(),
        });
    }
    Ok(url)
}

/// Pulls `message` out of an API error body, falling back to a generic marker.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.message)
        .map(|message| message.trim().to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| UNKNOWN_API_MESSAGE.to_string())
}
