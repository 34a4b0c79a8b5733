//! Report assembly and rendering.
//!
//! [`assemble`] turns an analysis into a format-agnostic [`ReportPayload`].
//! Three independent renderers turn the payload into a JSON record, a plain
//! text summary, and a template-filled HTML page, and a [`ReportSink`]
//! persists each one. [`write_reports`] runs all three and records per-format
//! success or failure in a [`ReportOutcome`]; one failing format never stops
//! the others.
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use followgraph_core::report::{
//!     DirectorySink, FileTemplateSource, assemble_snapshot, write_reports,
//! };
//! # use followgraph_core::pipeline::AccountSnapshot;
//!
//! # fn example(snapshot: &AccountSnapshot) {
//! let payload = assemble_snapshot(snapshot, Utc::now());
//! let sink = DirectorySink::new("github-analysis-results", payload.generated_at);
//! let outcome = write_reports(&payload, &FileTemplateSource::default(), &sink);
//! println!("{} of 3 reports written", outcome.succeeded());
//! # }
//! ```

mod error;
mod html;
mod json;
mod sink;
mod text;

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::api::Entity;
use crate::pipeline::AccountSnapshot;
use crate::relationship::AnalysisResult;

pub use error::RenderError;
pub use html::{
    DEFAULT_TEMPLATE_PATH, FileTemplateSource, StaticTemplate, TemplateSource, escape_html,
    render_html,
};
pub use json::render_json;
pub use sink::{DirectorySink, ReportSink, file_stamp};
pub use text::render_text;

/// The three report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Structured JSON record.
    Json,
    /// Plain-text summary.
    Text,
    /// Template-filled HTML page.
    Html,
}

impl ArtifactKind {
    /// All formats, in the order they are produced.
    pub const ALL: [ArtifactKind; 3] = [Self::Json, Self::Text, Self::Html];

    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Text => f.write_str("TXT"),
            Self::Html => f.write_str("HTML"),
        }
    }
}

/// Which relationship list a section holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Followed, not following back.
    OneWayOut,
    /// Following you, not followed back.
    OneWayIn,
    /// Both directions.
    Mutual,
}

impl SectionKind {
    /// Human-readable heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::OneWayOut => "People You Follow Who Don't Follow Back",
            Self::OneWayIn => "People Who Follow You But You Don't Follow Back",
            Self::Mutual => "Mutual Follows",
        }
    }

    /// Heading icon.
    #[must_use]
    pub fn emoji(self) -> &'static str {
        match self {
            Self::OneWayOut => "❌",
            Self::OneWayIn => "💔",
            Self::Mutual => "✅",
        }
    }

    /// CSS class used by the HTML template.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::OneWayOut => "not-following",
            Self::OneWayIn => "you-dont-follow",
            Self::Mutual => "mutual",
        }
    }
}

/// One labelled entity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    /// Which list this is.
    pub kind: SectionKind,
    /// Accounts in source-list order.
    pub entities: Vec<Entity>,
}

impl ReportSection {
    fn new(kind: SectionKind, entities: &[Entity]) -> Self {
        Self {
            kind,
            entities: entities.to_vec(),
        }
    }
}

/// Summary counts.
///
/// `followers` and `following` are the raw collection sizes, not sums of
/// derived lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Collected followers.
    pub followers: usize,
    /// Collected following.
    pub following: usize,
    /// Accounts in both lists.
    pub mutual: usize,
    /// Followed accounts that do not follow back.
    pub one_way_out: usize,
    /// Followers that are not followed back.
    pub one_way_in: usize,
}

impl ReportStats {
    /// Percentage of followed accounts that follow back; 0 when following nobody.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn follow_back_rate(&self) -> f64 {
        if self.following == 0 {
            0.0
        } else {
            self.mutual as f64 * 100.0 / self.following as f64
        }
    }
}

/// Format-agnostic report data handed to the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPayload {
    /// The analyzed account.
    pub account: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Summary counts.
    pub stats: ReportStats,
    /// Followed accounts that do not follow back.
    pub one_way_out: ReportSection,
    /// Followers that are not followed back.
    pub one_way_in: ReportSection,
    /// Accounts in both lists.
    pub mutual: ReportSection,
    /// True when a list stopped early and counts may be low.
    pub partial: bool,
}

impl ReportPayload {
    /// Sections in display order.
    #[must_use]
    pub fn sections(&self) -> [&ReportSection; 3] {
        [&self.one_way_out, &self.one_way_in, &self.mutual]
    }
}

/// Builds the report payload from raw collections and their analysis.
#[must_use]
pub fn assemble(
    account: &str,
    followers: &[Entity],
    following: &[Entity],
    analysis: &AnalysisResult,
    generated_at: DateTime<Utc>,
) -> ReportPayload {
    ReportPayload {
        account: account.to_string(),
        generated_at,
        stats: ReportStats {
            followers: followers.len(),
            following: following.len(),
            mutual: analysis.mutual.len(),
            one_way_out: analysis.one_way_out.len(),
            one_way_in: analysis.one_way_in.len(),
        },
        one_way_out: ReportSection::new(SectionKind::OneWayOut, &analysis.one_way_out),
        one_way_in: ReportSection::new(SectionKind::OneWayIn, &analysis.one_way_in),
        mutual: ReportSection::new(SectionKind::Mutual, &analysis.mutual),
        partial: false,
    }
}

/// Builds the report payload from a finished [`AccountSnapshot`].
#[must_use]
pub fn assemble_snapshot(snapshot: &AccountSnapshot, generated_at: DateTime<Utc>) -> ReportPayload {
    ReportPayload {
        partial: snapshot.partial,
        ..assemble(
            &snapshot.account,
            &snapshot.followers,
            &snapshot.following,
            &snapshot.analysis,
            generated_at,
        )
    }
}

/// A report that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifact {
    /// Format of the report.
    pub kind: ArtifactKind,
    /// Where the sink stored it.
    pub path: PathBuf,
}

/// A report that could not be produced.
#[derive(Debug)]
pub struct FailedArtifact {
    /// Format of the report.
    pub kind: ArtifactKind,
    /// Why it was not produced.
    pub error: RenderError,
}

/// Per-format result of [`write_reports`].
#[derive(Debug, Default)]
pub struct ReportOutcome {
    /// Reports that were written, in production order.
    pub written: Vec<WrittenArtifact>,
    /// Reports that failed, in production order.
    pub failed: Vec<FailedArtifact>,
}

impl ReportOutcome {
    /// Number of reports written.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.written.len()
    }

    /// Number of reports that failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.failed.len()
    }

    /// Returns true when every format was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Path of the written report of `kind`, if any.
    #[must_use]
    pub fn path_of(&self, kind: ArtifactKind) -> Option<&Path> {
        self.written
            .iter()
            .find(|artifact| artifact.kind == kind)
            .map(|artifact| artifact.path.as_path())
    }
}

/// Renders one format.
///
/// # Errors
///
/// Returns [`RenderError`] when serialization or template loading fails.
pub fn render(
    kind: ArtifactKind,
    payload: &ReportPayload,
    templates: &dyn TemplateSource,
) -> Result<String, RenderError> {
    match kind {
        ArtifactKind::Json => render_json(payload),
        ArtifactKind::Text => Ok(render_text(payload)),
        ArtifactKind::Html => render_html(payload, templates),
    }
}

/// Renders and writes every format independently.
pub fn write_reports(
    payload: &ReportPayload,
    templates: &dyn TemplateSource,
    sink: &dyn ReportSink,
) -> ReportOutcome {
    let mut outcome = ReportOutcome::default();
    for kind in ArtifactKind::ALL {
        let result = render(kind, payload, templates).and_then(|body| sink.write(kind, &body));
        match result {
            Ok(path) => {
                info!(format = %kind, path = %path.display(), "report written");
                outcome.written.push(WrittenArtifact { kind, path });
            }
            Err(error) => {
                warn!(format = %kind, error = %error, "report failed");
                outcome.failed.push(FailedArtifact { kind, error });
            }
        }
    }
    outcome
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::relationship::analyze;

    pub(crate) fn entities(handles: &[&str]) -> Vec<Entity> {
        handles
            .iter()
            .map(|h| {
                Entity::new(
                    *h,
                    format!("https://github.com/{h}"),
                    format!("https://avatars.example/{h}.png"),
                )
            })
            .collect()
    }

    pub(crate) fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 15).unwrap()
    }

    pub(crate) fn sample_payload() -> ReportPayload {
        let followers = entities(&["a", "b", "c"]);
        let following = entities(&["b", "c", "d"]);
        let analysis = analyze(&followers, &following);
        assemble("octocat", &followers, &following, &analysis, fixed_time())
    }

    /// Records writes in memory; optionally fails one format.
    struct MemorySink {
        fail: Option<ArtifactKind>,
        writes: Mutex<Vec<(ArtifactKind, String)>>,
    }

    impl ReportSink for MemorySink {
        fn write(&self, kind: ArtifactKind, contents: &str) -> Result<PathBuf, RenderError> {
            if self.fail == Some(kind) {
                return Err(RenderError::write(
                    kind,
                    "memory",
                    std::io::Error::other("disk full"),
                ));
            }
            self.writes.lock().unwrap().push((kind, contents.to_string()));
            Ok(PathBuf::from(format!("memory.{}", kind.extension())))
        }
    }

    #[test]
    fn test_assemble_counts_and_sections() {
        let payload = sample_payload();
        assert_eq!(
            payload.stats,
            ReportStats {
                followers: 3,
                following: 3,
                mutual: 2,
                one_way_out: 1,
                one_way_in: 1,
            }
        );
        assert_eq!(payload.one_way_out.entities[0].handle, "d");
        assert_eq!(payload.one_way_in.entities[0].handle, "a");
        let kinds: Vec<_> = payload.sections().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::OneWayOut, SectionKind::OneWayIn, SectionKind::Mutual]
        );
    }

    #[test]
    fn test_totals_are_raw_collection_sizes() {
        // Duplicate follower handle: raw count is 3 even though only 2 are distinct.
        let followers = entities(&["a", "a", "b"]);
        let following = entities(&["b"]);
        let analysis = analyze(&followers, &following);
        let payload = assemble("octocat", &followers, &following, &analysis, fixed_time());
        assert_eq!(payload.stats.followers, 3);
        assert_eq!(payload.stats.one_way_in, 2);
    }

    #[test]
    fn test_follow_back_rate_handles_zero_following() {
        let payload = assemble("nobody", &[], &[], &AnalysisResult::default(), fixed_time());
        assert!(payload.stats.follow_back_rate().abs() < f64::EPSILON);
        let rate = sample_payload().stats.follow_back_rate();
        assert!((rate - 66.666_666).abs() < 0.001, "got {rate}");
    }

    #[test]
    fn test_write_reports_all_formats() {
        let sink = MemorySink {
            fail: None,
            writes: Mutex::new(Vec::new()),
        };
        let template = StaticTemplate::new("<h1>{{USERNAME}}</h1>");
        let outcome = write_reports(&sample_payload(), &template, &sink);

        assert!(outcome.is_complete());
        assert_eq!(outcome.succeeded(), 3);
        assert_eq!(outcome.path_of(ArtifactKind::Html), Some(Path::new("memory.html")));
        let writes = sink.writes.lock().unwrap();
        assert_eq!(writes.len(), 3);
        assert_eq!(writes[2].1, "<h1>octocat</h1>");
    }

    #[test]
    fn test_missing_template_does_not_block_other_formats() {
        let sink = MemorySink {
            fail: None,
            writes: Mutex::new(Vec::new()),
        };
        let template = FileTemplateSource::new("/definitely/not/here/template.html");
        let outcome = write_reports(&sample_payload(), &template, &sink);

        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failures(), 1);
        assert_eq!(outcome.failed[0].kind, ArtifactKind::Html);
        assert!(matches!(
            outcome.failed[0].error,
            RenderError::TemplateLoad { .. }
        ));
        assert!(outcome.path_of(ArtifactKind::Html).is_none());
        assert!(outcome.path_of(ArtifactKind::Json).is_some());
    }

    #[test]
    fn test_sink_failure_is_isolated() {
        let sink = MemorySink {
            fail: Some(ArtifactKind::Json),
            writes: Mutex::new(Vec::new()),
        };
        let template = StaticTemplate::new("{{USERNAME}}");
        let outcome = write_reports(&sample_payload(), &template, &sink);

        assert_eq!(outcome.succeeded(), 2);
        assert_eq!(outcome.failed[0].kind, ArtifactKind::Json);
    }
}
