//! HTML report from a placeholder template.
//!
//! The template is plain text containing `{{NAME}}` placeholders. Every
//! occurrence is replaced literally; unknown placeholders are left alone.
//! Section fragments are generated here and are empty for empty lists.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::{RenderError, ReportPayload, ReportSection};

/// Template location used when none is configured.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/report.html";

/// Supplies the HTML template text.
pub trait TemplateSource: Send + Sync {
    /// Loads the template.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateLoad`] when the template is unavailable.
    fn load(&self) -> Result<String, RenderError>;
}

/// Reads the template from a file on every render.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    /// Creates a source reading `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileTemplateSource {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_PATH)
    }
}

impl TemplateSource for FileTemplateSource {
    fn load(&self) -> Result<String, RenderError> {
        debug!(path = %self.path.display(), "loading HTML template");
        fs::read_to_string(&self.path).map_err(|e| RenderError::template_load(&self.path, e))
    }
}

/// An in-memory template.
#[derive(Debug, Clone)]
pub struct StaticTemplate(String);

impl StaticTemplate {
    /// Wraps template text.
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }
}

impl TemplateSource for StaticTemplate {
    fn load(&self) -> Result<String, RenderError> {
        Ok(self.0.clone())
    }
}

/// Escapes text for use in HTML content and quoted attributes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn render_section(section: &ReportSection) -> String {
    if section.entities.is_empty() {
        return String::new();
    }

    let cards: String = section
        .entities
        .iter()
        .map(|e| {
            let handle = escape_html(&e.handle);
            format!(
                r#"
                <div class="user-card">
                    <img src="{avatar}" alt="{handle}" class="avatar">
                    <div class="user-info">
                        <a href="{profile}" target="_blank" rel="noopener" class="username">@{handle}</a>
                    </div>
                </div>"#,
                avatar = escape_html(&e.avatar_url),
                profile = escape_html(&e.profile_url),
            )
        })
        .collect();

    format!(
        r#"
        <div class="section {class}">
            <h2 class="section-title">{emoji} {title} ({count})</h2>
            <div class="user-grid">{cards}
            </div>
        </div>"#,
        class = section.kind.css_class(),
        emoji = section.kind.emoji(),
        title = escape_html(section.kind.title()),
        count = section.entities.len(),
    )
}

/// Fills the template from `templates` with the payload.
///
/// # Errors
///
/// Returns [`RenderError::TemplateLoad`] when the template cannot be loaded.
pub fn render_html(
    payload: &ReportPayload,
    templates: &dyn TemplateSource,
) -> Result<String, RenderError> {
    let template = templates.load()?;
    let stats = &payload.stats;

    let replacements = [
        ("{{USERNAME}}", escape_html(&payload.account)),
        (
            "{{TIMESTAMP}}",
            payload
                .generated_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
        ),
        ("{{FOLLOWERS_COUNT}}", stats.followers.to_string()),
        ("{{FOLLOWING_COUNT}}", stats.following.to_string()),
        ("{{MUTUAL_COUNT}}", stats.mutual.to_string()),
        ("{{NOT_FOLLOWING_BACK_COUNT}}", stats.one_way_out.to_string()),
        ("{{YOU_DONT_FOLLOW_BACK_COUNT}}", stats.one_way_in.to_string()),
        (
            "{{NOT_FOLLOWING_BACK_SECTION}}",
            render_section(&payload.one_way_out),
        ),
        (
            "{{YOU_DONT_FOLLOW_BACK_SECTION}}",
            render_section(&payload.one_way_in),
        ),
        ("{{MUTUAL_FOLLOWS_SECTION}}", render_section(&payload.mutual)),
    ];

    Ok(substitute(&template, &replacements))
}

/// Replaces placeholders in one left-to-right pass over `template`.
///
/// Substituted values are copied to the output and never scanned again, so
/// placeholder-like text inside an account name or URL stays literal.
fn substitute(template: &str, replacements: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match replacements
            .iter()
            .find(|(placeholder, _)| tail.starts_with(placeholder))
        {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
