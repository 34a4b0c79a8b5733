//! Client identifier sent as the `User-Agent` header on every API request.
//!
//! The remote API rejects requests without a `User-Agent`; a stable,
//! versioned identifier also makes our traffic easy to attribute.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/followgraph";

/// Default User-Agent for API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("followgraph/{version} (follower-analyzer; +{PROJECT_UA_URL})")
}
