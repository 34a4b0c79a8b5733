//! Social-graph API access.
//!
//! This module provides [`ApiClient`], which issues single authenticated
//! GET requests for one page of a followers/following list and classifies
//! the response.
//!
//! # Example
//!
//! ```no_run
//! use followgraph_core::api::{ApiClient, ApiClientConfig, Resource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ApiClientConfig::new("ghp_example"))?;
//! let page = client
//!     .fetch(&Resource::Followers("octocat".to_string()), 1, 100)
//!     .await?;
//! println!("first page has {} followers", page.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod entity;
mod error;
mod resource;

pub use client::{ApiClient, ApiClientConfig, DEFAULT_API_BASE_URL, MAX_PAGE_SIZE};
pub use entity::Entity;
pub use error::{ApiError, UNKNOWN_API_MESSAGE};
pub use resource::Resource;
