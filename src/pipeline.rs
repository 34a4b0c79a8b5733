//! The `analyze(account)` entry point.
//!
//! [`FollowGraph::analyze`] collects the followers and following lists
//! concurrently, joins them, and runs the relationship analysis. Both lists
//! must be obtainable for the analysis to proceed; a list that stopped early
//! after at least one page is accepted as a partial result.

use std::fmt;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::api::{ApiError, Entity, Resource};
use crate::collect::{Collection, CollectorConfig, PageSource, PaginatedCollector, Termination};
use crate::relationship::{self, AnalysisResult};

/// Which of the two lists an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The followers list.
    Followers,
    /// The following list.
    Following,
}

impl Side {
    /// The opposite list.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Followers => Self::Following,
            Self::Following => Self::Followers,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Followers => f.write_str("followers"),
            Self::Following => f.write_str("following"),
        }
    }
}

/// Errors that stop an analysis run.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// No account identifier was given.
    #[error("account identifier must not be empty")]
    EmptyAccount,

    /// One list could not be obtained at all (its first page failed).
    #[error("could not fetch {side} for @{account}: {source}")]
    Join {
        /// The list that failed.
        side: Side,
        /// The account being analyzed.
        account: String,
        /// The error that ended the collection on its first page.
        #[source]
        source: ApiError,
    },
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone)]
pub struct AccountSnapshot {
    /// The analyzed account.
    pub account: String,
    /// Collected followers, in API order.
    pub followers: Vec<Entity>,
    /// Collected following, in API order.
    pub following: Vec<Entity>,
    /// The derived relationship lists.
    pub analysis: AnalysisResult,
    /// True when either list stopped early after a mid-run failure.
    pub partial: bool,
}

/// Analysis entry point bound to one page source and collector configuration.
pub struct FollowGraph<S: PageSource> {
    source: S,
    config: CollectorConfig,
}

impl<S: PageSource> FollowGraph<S> {
    /// Creates an analyzer over `source`.
    pub fn new(source: S, config: CollectorConfig) -> Self {
        Self { source, config }
    }

    /// Collects both lists for `account` and analyzes them.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzeError::EmptyAccount`] for a blank account and
    /// [`AnalyzeError::Join`] when either list is unobtainable. The first
    /// list found unobtainable is reported and the other collection is
    /// dropped at its next await point; when both settle in the same poll,
    /// followers is checked first.
    #[instrument(skip(self))]
    pub async fn analyze(&self, account: &str) -> Result<AccountSnapshot, AnalyzeError> {
        let account = account.trim();
        if account.is_empty() {
            return Err(AnalyzeError::EmptyAccount);
        }
        info!("starting follower analysis");

        let collector = PaginatedCollector::new(&self.source, self.config.clone());
        let followers_run = collector.collect_all(Resource::Followers(account.to_string()));
        let following_run = collector.collect_all(Resource::Following(account.to_string()));
        tokio::pin!(followers_run, following_run);

        // Whichever list settles first decides whether the other is still worth paging.
        let (followers, following) = tokio::select! {
            biased;
            followers = &mut followers_run => {
                let followers = require(followers, Side::Followers, account)
                    .map_err(abandon_sibling)?;
                (followers, require(following_run.await, Side::Following, account)?)
            }
            following = &mut following_run => {
                let following = require(following, Side::Following, account)
                    .map_err(abandon_sibling)?;
                (require(followers_run.await, Side::Followers, account)?, following)
            }
        };

        let partial = !followers.is_complete() || !following.is_complete();
        if partial {
            warn!(
                followers = followers.len(),
                following = following.len(),
                "analysis is based on partial data"
            );
        }

        info!(
            followers = followers.len(),
            following = following.len(),
            "collections joined"
        );
        let analysis = relationship::analyze(&followers.entities, &following.entities);
        info!(
            mutual = analysis.mutual.len(),
            one_way_out = analysis.one_way_out.len(),
            one_way_in = analysis.one_way_in.len(),
            "analysis complete"
        );

        Ok(AccountSnapshot {
            account: account.to_string(),
            followers: followers.entities,
            following: following.entities,
            analysis,
            partial,
        })
    }
}

impl<S: PageSource> fmt::Debug for FollowGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FollowGraph")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Turns an unobtainable collection into a join error.
fn require(collection: Collection, side: Side, account: &str) -> Result<Collection, AnalyzeError> {
    match collection.termination {
        Termination::Failed { error, .. } if collection.is_unobtainable() => {
            Err(AnalyzeError::Join {
                side,
                account: account.to_string(),
                source: error,
            })
        }
        termination => Ok(Collection {
            termination,
            ..collection
        }),
    }
}

fn abandon_sibling(error: AnalyzeError) -> AnalyzeError {
    if let AnalyzeError::Join { side, .. } = &error {
        warn!(
            unobtainable = %side,
            abandoned = %side.other(),
            "list unobtainable; abandoning the other collection"
        );
    }
    error
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Barrier;

    use super::*;

    /// Serves fixed pages per list; `None` for a list means every request fails with 401.
    struct FixedSource {
        followers: Option<Vec<Vec<&'static str>>>,
        following: Option<Vec<Vec<&'static str>>>,
    }

    #[async_trait]
    impl PageSource for FixedSource {
        async fn fetch_page(
            &self,
            resource: &Resource,
            page: u32,
            _per_page: u8,
        ) -> Result<Vec<Entity>, ApiError> {
            let pages = match resource {
                Resource::Followers(_) => &self.followers,
                Resource::Following(_) => &self.following,
            };
            let Some(pages) = pages else {
                return Err(ApiError::http("fixed", 401, "Bad credentials"));
            };
            let index = usize::try_from(page - 1).unwrap();
            Ok(pages
                .get(index)
                .map(|handles| {
                    handles
                        .iter()
                        .map(|h| Entity::new(*h, format!("https://github.com/{h}"), "avatar"))
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    /// Page 1 of either list only returns once page 1 of the other list is in flight.
    struct RendezvousSource {
        barrier: Barrier,
    }

    #[async_trait]
    impl PageSource for RendezvousSource {
        async fn fetch_page(
            &self,
            _resource: &Resource,
            page: u32,
            _per_page: u8,
        ) -> Result<Vec<Entity>, ApiError> {
            if page > 1 {
                return Ok(Vec::new());
            }
            self.barrier.wait().await;
            Ok(vec![Entity::new("a", "https://github.com/a", "avatar")])
        }
    }

    /// Followers fail on page 1; following serves `following_pages` one-entity pages.
    struct FailFastFollowersSource {
        following_pages: u32,
        following_requests: AtomicU32,
    }

    #[async_trait]
    impl PageSource for FailFastFollowersSource {
        async fn fetch_page(
            &self,
            resource: &Resource,
            page: u32,
            _per_page: u8,
        ) -> Result<Vec<Entity>, ApiError> {
            if let Resource::Following(_) = resource {
                self.following_requests.fetch_add(1, Ordering::SeqCst);
            }
            tokio::task::yield_now().await;
            match resource {
                Resource::Followers(_) => Err(ApiError::http("fixed", 401, "Bad credentials")),
                Resource::Following(_) if page > self.following_pages => Ok(Vec::new()),
                Resource::Following(_) => {
                    let handle = format!("g{page}");
                    Ok(vec![Entity::new(handle.clone(), handle, "avatar")])
                }
            }
        }
    }

    fn fast_config() -> CollectorConfig {
        CollectorConfig {
            page_delay: Duration::ZERO,
            ..CollectorConfig::default()
        }
    }

    fn graph(source: FixedSource) -> FollowGraph<FixedSource> {
        FollowGraph::new(source, fast_config())
    }

    fn handles(list: &[Entity]) -> Vec<&str> {
        list.iter().map(|e| e.handle.as_str()).collect()
    }

    #[tokio::test]
    async fn test_analyze_joins_both_lists() {
        let graph = graph(FixedSource {
            followers: Some(vec![vec!["a", "b"], vec!["c"]]),
            following: Some(vec![vec!["b", "c", "d"]]),
        });
        let snapshot = graph.analyze("octocat").await.unwrap();

        assert_eq!(snapshot.account, "octocat");
        assert_eq!(snapshot.followers.len(), 3);
        assert_eq!(snapshot.following.len(), 3);
        assert_eq!(handles(&snapshot.analysis.mutual), vec!["b", "c"]);
        assert_eq!(handles(&snapshot.analysis.one_way_out), vec!["d"]);
        assert_eq!(handles(&snapshot.analysis.one_way_in), vec!["a"]);
        assert!(!snapshot.partial);
    }

    #[tokio::test]
    async fn test_unobtainable_followers_is_join_error() {
        let graph = graph(FixedSource {
            followers: None,
            following: Some(vec![vec!["b"]]),
        });
        let err = graph.analyze("octocat").await.unwrap_err();
        match err {
            AnalyzeError::Join { side, account, source } => {
                assert_eq!(side, Side::Followers);
                assert_eq!(account, "octocat");
                assert_eq!(source.status(), Some(401));
            }
            AnalyzeError::EmptyAccount => panic!("expected join error"),
        }
    }

    #[tokio::test]
    async fn test_unobtainable_following_is_join_error() {
        let graph = graph(FixedSource {
            followers: Some(vec![vec!["a"]]),
            following: None,
        });
        let err = graph.analyze("octocat").await.unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::Join {
                side: Side::Following,
                ..
            }
        ));
        assert!(err.to_string().contains("could not fetch following for @octocat"));
    }

    #[tokio::test]
    async fn test_both_unobtainable_reports_followers() {
        let graph = graph(FixedSource {
            followers: None,
            following: None,
        });
        let err = graph.analyze("octocat").await.unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::Join {
                side: Side::Followers,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_both_lists_are_collected_concurrently() {
        let graph = FollowGraph::new(
            RendezvousSource {
                barrier: Barrier::new(2),
            },
            fast_config(),
        );
        let snapshot = tokio::time::timeout(Duration::from_secs(5), graph.analyze("octocat"))
            .await
            .expect("followers and following page 1 must be in flight together")
            .unwrap();
        assert_eq!(handles(&snapshot.analysis.mutual), vec!["a"]);
    }

    #[tokio::test]
    async fn test_unobtainable_side_stops_sibling_collection() {
        let graph = FollowGraph::new(
            FailFastFollowersSource {
                following_pages: 50,
                following_requests: AtomicU32::new(0),
            },
            fast_config(),
        );
        let err = graph.analyze("octocat").await.unwrap_err();

        assert!(matches!(
            err,
            AnalyzeError::Join {
                side: Side::Followers,
                ..
            }
        ));
        let requests = graph.source.following_requests.load(Ordering::SeqCst);
        assert!(
            requests <= 2,
            "following kept paging after followers failed: {requests} requests"
        );
    }

    #[test]
    fn test_side_other() {
        assert_eq!(Side::Followers.other(), Side::Following);
        assert_eq!(Side::Following.other(), Side::Followers);
    }

    #[tokio::test]
    async fn test_empty_lists_are_not_errors() {
        let graph = graph(FixedSource {
            followers: Some(vec![]),
            following: Some(vec![]),
        });
        let snapshot = graph.analyze("loner").await.unwrap();
        assert!(snapshot.followers.is_empty());
        assert!(snapshot.following.is_empty());
        assert_eq!(snapshot.analysis, AnalysisResult::default());
    }

    #[tokio::test]
    async fn test_blank_account_rejected() {
        let graph = graph(FixedSource {
            followers: Some(vec![]),
            following: Some(vec![]),
        });
        assert!(matches!(
            graph.analyze("   ").await,
            Err(AnalyzeError::EmptyAccount)
        ));
    }
}
