//! Account references returned by the followers/following endpoints.

use serde::{Deserialize, Serialize};

/// One remote account reference.
///
/// Identity is the `handle`; the URLs are carried through to the reports
/// untouched. All three fields are required when decoding an API page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique account handle (`login` in the API payload).
    #[serde(rename = "login")]
    pub handle: String,
    /// Public profile page (`html_url` in the API payload).
    #[serde(rename = "html_url")]
    pub profile_url: String,
    /// Avatar image URL.
    pub avatar_url: String,
}

impl Entity {
    /// Creates an entity from its three parts.
    pub fn new(
        handle: impl Into<String>,
        profile_url: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            handle: handle.into(),
            profile_url: profile_url.into(),
            avatar_url: avatar_url.into(),
        }
    }
}
