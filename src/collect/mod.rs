//! Paginated collection of a followers/following list.
//!
//! [`PaginatedCollector`] drives a [`PageSource`] page by page, starting at
//! page 1, until the source returns an empty page. Requests are strictly
//! sequential with a fixed courtesy delay between them.
//!
//! # Failure tolerance
//!
//! A failed page never discards earlier pages. The collector stops at the
//! first page it cannot obtain (after any configured retries) and returns a
//! [`Collection`] holding everything accumulated so far, with the failure
//! recorded in [`Termination::Failed`]. Whether a partial result is usable
//! is the caller's decision.
//!
//! # Example
//!
//! ```no_run
//! use followgraph_core::api::{ApiClient, ApiClientConfig, Resource};
//! use followgraph_core::collect::{CollectorConfig, PaginatedCollector};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ApiClientConfig::new("ghp_example"))?;
//! let collector = PaginatedCollector::new(&client, CollectorConfig::default());
//! let followers = collector
//!     .collect_all(Resource::Followers("octocat".to_string()))
//!     .await;
//! println!("{} followers ({} requests)", followers.len(), followers.requests);
//! # Ok(())
//! # }
//! ```

mod retry;

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::api::{ApiError, Entity, MAX_PAGE_SIZE, Resource};

pub use retry::{
    DEFAULT_PAGE_RETRIES, FailureType, MAX_PAGE_RETRIES, PageRetryPolicy, RetryDecision,
    classify_error,
};

/// Default delay between consecutive page requests.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

/// A source of list pages, implemented by [`crate::api::ApiClient`].
///
/// Page numbers are 1-indexed. An empty `Ok` page means the list is exhausted.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches one page of `resource`.
    async fn fetch_page(
        &self,
        resource: &Resource,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<Entity>, ApiError>;
}

/// Settings for one collection run.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Entities requested per page (clamped to the API maximum by the client).
    pub page_size: u8,
    /// Pause after every non-empty page and before every retry.
    pub page_delay: Duration,
    /// Extra attempts for transiently failing pages.
    pub retry: PageRetryPolicy,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
            retry: PageRetryPolicy::default(),
        }
    }
}

/// How a collection run ended.
#[derive(Debug)]
pub enum Termination {
    /// An empty page was returned; the list is complete.
    Exhausted,
    /// `page` could not be obtained; entities from earlier pages are kept.
    Failed {
        /// The page that failed (1-indexed).
        page: u32,
        /// The last error seen for that page.
        error: ApiError,
    },
}

/// Result of one collection run.
#[derive(Debug)]
pub struct Collection {
    /// The list that was collected.
    pub resource: Resource,
    /// Accumulated entities in API order.
    pub entities: Vec<Entity>,
    /// Number of requests issued, retries included.
    pub requests: u32,
    /// Why the run stopped.
    pub termination: Termination,
}

impl Collection {
    /// Number of collected entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true when no entities were collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true when the run reached the end of the list.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Exhausted)
    }

    /// Returns true when not even the first page could be obtained.
    #[must_use]
    pub fn is_unobtainable(&self) -> bool {
        matches!(self.termination, Termination::Failed { page: 1, .. })
    }
}

/// Transient per-page outcome inside the collection loop.
enum FetchPage {
    More(Vec<Entity>),
    Exhausted,
    Failed(ApiError),
}

/// Drives a [`PageSource`] across all pages of one resource.
///
/// Holds no mutable state; independent runs may execute concurrently against
/// the same source.
pub struct PaginatedCollector<'a, S: PageSource + ?Sized> {
    source: &'a S,
    config: CollectorConfig,
}

impl<'a, S: PageSource + ?Sized> PaginatedCollector<'a, S> {
    /// Creates a collector over `source`.
    pub fn new(source: &'a S, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    /// Returns the collector settings.
    #[must_use]
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collects every page of `resource`.
    ///
    /// Never fails: a page failure ends the run and is reported through
    /// [`Collection::termination`].
    #[instrument(skip(self, resource), fields(resource = %resource))]
    pub async fn collect_all(&self, resource: Resource) -> Collection {
        let mut entities = Vec::new();
        let mut requests = 0_u32;
        let mut page = 1_u32;

        loop {
            debug!(page, "fetching page");
            match self.fetch_page(&resource, page, &mut requests).await {
                FetchPage::Exhausted => {
                    info!(
                        total = entities.len(),
                        pages = page - 1,
                        requests,
                        "collection complete"
                    );
                    return Collection {
                        resource,
                        entities,
                        requests,
                        termination: Termination::Exhausted,
                    };
                }
                FetchPage::More(batch) => {
                    debug!(page, count = batch.len(), "page collected");
                    entities.extend(batch);
                    page += 1;
                    self.pause().await;
                }
                FetchPage::Failed(error) => {
                    warn!(
                        page,
                        kept = entities.len(),
                        error = %error,
                        "page request failed; stopping with partial result"
                    );
                    return Collection {
                        resource,
                        entities,
                        requests,
                        termination: Termination::Failed { page, error },
                    };
                }
            }
        }
    }

    async fn fetch_page(&self, resource: &Resource, page: u32, requests: &mut u32) -> FetchPage {
        let mut attempts = 0_u32;
        loop {
            attempts += 1;
            *requests += 1;
            let error = match self
                .source
                .fetch_page(resource, page, self.config.page_size)
                .await
            {
                Ok(batch) if batch.is_empty() => return FetchPage::Exhausted,
                Ok(batch) => return FetchPage::More(batch),
                Err(error) => error,
            };

            match self.config.retry.should_retry(classify_error(&error), attempts) {
                RetryDecision::Retry { attempt } => {
                    warn!(page, attempt, error = %error, "page request failed; retrying");
                    self.pause().await;
                }
                RetryDecision::DoNotRetry { reason } => {
                    debug!(page, %reason, "giving up on page");
                    return FetchPage::Failed(error);
                }
            }
        }
    }

    async fn pause(&self) {
        if !self.config.page_delay.is_zero() {
            tokio::time::sleep(self.config.page_delay).await;
        }
    }
}
