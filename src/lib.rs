//! Followgraph Core Library
//!
//! This library answers one question about a GitHub account: who does it
//! follow that does not follow back, and the reverse. It fetches the
//! paginated followers and following lists, diffs them by handle, and
//! renders the result as JSON, plain text, and HTML reports.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`api`] - Single authenticated page requests and response classification
//! - [`collect`] - Page-by-page collection with rate-limit delay and partial-failure tolerance
//! - [`relationship`] - Mutual / one-way set analysis
//! - [`pipeline`] - Concurrent collection of both lists and the `analyze(account)` entry point
//! - [`report`] - Report payload assembly, renderers, and report sinks

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod collect;
pub mod pipeline;
pub mod relationship;
pub mod report;
mod user_agent;

// Re-export commonly used types
pub use api::{ApiClient, ApiClientConfig, ApiError, DEFAULT_API_BASE_URL, Entity, Resource};
pub use collect::{
    Collection, CollectorConfig, DEFAULT_PAGE_DELAY, PageRetryPolicy, PageSource,
    PaginatedCollector, Termination,
};
pub use pipeline::{AccountSnapshot, AnalyzeError, FollowGraph, Side};
pub use relationship::{AnalysisResult, analyze};
pub use report::{
    ArtifactKind, DirectorySink, FileTemplateSource, RenderError, ReportOutcome, ReportPayload,
    ReportSink, TemplateSource, assemble, assemble_snapshot, write_reports,
};
