//! Logical list resources scoped by account identifier.

use std::fmt;

/// One of the two paginated relationship lists of an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Accounts that follow `account`.
    Followers(String),
    /// Accounts that `account` follows.
    Following(String),
}

impl Resource {
    /// The account this resource is scoped to.
    #[must_use]
    pub fn account(&self) -> &str {
        match self {
            Self::Followers(account) | Self::Following(account) => account,
        }
    }

    /// Short label used in logs and error messages.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Followers(_) => "followers",
            Self::Following(_) => "following",
        }
    }

    /// API path relative to the base URL, with the account percent-encoded.
    #[must_use]
    pub fn path(&self) -> String {
        let account = urlencoding::encode(self.account());
        format!("/users/{account}/{}", self.label())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-of-{}", self.label(), self.account())
    }
}
