//! Error types for report rendering and persistence.

use std::path::PathBuf;

use thiserror::Error;

use super::ArtifactKind;

/// Errors that prevent one report format from being produced.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The HTML template could not be read.
    #[error("failed to load HTML template {path}: {source}")]
    TemplateLoad {
        /// Template location.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The JSON record could not be serialized.
    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    /// The rendered report could not be persisted.
    #[error("failed to write {kind} report to {path}: {source}")]
    Write {
        /// Which format was being written.
        kind: ArtifactKind,
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// Creates a template load error.
    pub fn template_load(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::TemplateLoad {
            path: path.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(kind: ArtifactKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            kind,
            path: path.into(),
            source,
        }
    }
}
