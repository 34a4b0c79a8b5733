//! Persistence of rendered reports.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::{ArtifactKind, RenderError};

/// Destination for rendered reports.
pub trait ReportSink: Send + Sync {
    /// Persists one rendered report and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Write`] when the report cannot be stored.
    fn write(&self, kind: ArtifactKind, contents: &str) -> Result<PathBuf, RenderError>;
}

/// Filesystem-safe timestamp used in report file names.
#[must_use]
pub fn file_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// Writes `analysis-<stamp>.<ext>` files into one directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    stem: String,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, naming files after `generated_at`.
    pub fn new(dir: impl Into<PathBuf>, generated_at: DateTime<Utc>) -> Self {
        Self {
            dir: dir.into(),
            stem: format!("analysis-{}", file_stamp(generated_at)),
        }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a report of `kind` is written to.
    #[must_use]
    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, kind.extension()))
    }
}

impl ReportSink for DirectorySink {
    fn write(&self, kind: ArtifactKind, contents: &str) -> Result<PathBuf, RenderError> {
        fs::create_dir_all(&self.dir).map_err(|e| RenderError::write(kind, &self.dir, e))?;
        let path = self.path_for(kind);
        fs::write(&path, contents).map_err(|e| RenderError::write(kind, &path, e))?;
        debug!(path = %path.display(), bytes = contents.len(), "report persisted");
        Ok(path)
    }
}
