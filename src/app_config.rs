//! Application configuration: config file defaults merged with CLI arguments.
//!
//! Priority for every setting: command line (or its environment variable)
//! > config file > built-in default.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use followgraph_core::DEFAULT_API_BASE_URL;
use followgraph_core::collect::{DEFAULT_PAGE_DELAY, MAX_PAGE_RETRIES};
use followgraph_core::report::DEFAULT_TEMPLATE_PATH;

use crate::cli::Args;

/// Default directory for generated reports.
pub const DEFAULT_OUTPUT_DIR: &str = "github-analysis-results";

const MAX_PAGE_DELAY_MS: u64 = 60_000;

/// `key = value` file configuration for followgraph defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Default report directory.
    pub output_dir: Option<PathBuf>,
    /// Default HTML template.
    pub template: Option<PathBuf>,
    /// API base URL (enterprise installs).
    pub api_base_url: Option<String>,
    /// Delay between page requests in milliseconds.
    pub page_delay_ms: Option<u64>,
    /// Extra attempts per transiently failing page.
    pub page_retries: Option<u32>,
    /// Whether to open the HTML report after writing it.
    pub open_browser: Option<bool>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.page_delay_ms
            && delay > MAX_PAGE_DELAY_MS
        {
            bail!(
                "Invalid config value for `page_delay_ms`: {delay}. Expected range: 0..={MAX_PAGE_DELAY_MS}"
            );
        }
        if let Some(retries) = self.page_retries
            && retries > MAX_PAGE_RETRIES
        {
            bail!(
                "Invalid config value for `page_retries`: {retries}. Expected range: 0..={MAX_PAGE_RETRIES}"
            );
        }
        if let Some(url) = &self.api_base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            bail!("Invalid config value for `api_base_url`: '{url}'. Expected an http(s) URL");
        }
        Ok(())
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/followgraph/config.toml`
/// 2. `$HOME/.config/followgraph/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("followgraph")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("followgraph")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file.
///
/// An explicit path must exist; a missing default file simply yields no config.
pub fn load_file_config(explicit: Option<&Path>) -> Result<Option<FileConfig>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match resolve_default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
    config.validate()?;
    Ok(Some(config))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "template" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `template` value on line {line_no}"))?;
                cfg.template = Some(PathBuf::from(parsed));
            }
            "api_base_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `api_base_url` value on line {line_no}"))?;
                cfg.api_base_url = Some(parsed);
            }
            "page_delay_ms" => {
                let parsed = value
                    .parse::<u64>()
                    .with_context(|| format!("Invalid `page_delay_ms` value on line {line_no}"))?;
                cfg.page_delay_ms = Some(parsed);
            }
            "page_retries" => {
                let parsed = value
                    .parse::<u32>()
                    .with_context(|| format!("Invalid `page_retries` value on line {line_no}"))?;
                cfg.page_retries = Some(parsed);
            }
            "open_browser" => {
                let parsed = parse_boolean(value)
                    .with_context(|| format!("Invalid `open_browser` value on line {line_no}"))?;
                cfg.open_browser = Some(parsed);
            }
            other => bail!("Unknown config key `{other}` on line {line_no}"),
        }
    }
    Ok(cfg)
}

/// Drops a `#` comment that is not inside a double-quoted string.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(value: &str) -> Result<String> {
    let Some(inner) = value
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        bail!("expected a double-quoted string, got `{value}`");
    };
    if inner.contains('"') {
        bail!("unexpected quote inside string `{value}`");
    }
    Ok(inner.to_string())
}

fn parse_boolean(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("expected `true` or `false`, got `{value}`"),
    }
}

/// Fully resolved settings for one run.
#[derive(Clone)]
pub struct RunSettings {
    pub account: String,
    pub token: String,
    pub output_dir: PathBuf,
    pub template: PathBuf,
    pub api_base_url: String,
    pub page_delay: Duration,
    pub page_retries: u32,
    pub open_browser: bool,
}

impl std::fmt::Debug for RunSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunSettings")
            .field("account", &self.account)
            .field("token", &"<redacted>")
            .field("output_dir", &self.output_dir)
            .field("template", &self.template)
            .field("api_base_url", &self.api_base_url)
            .field("page_delay", &self.page_delay)
            .field("page_retries", &self.page_retries)
            .field("open_browser", &self.open_browser)
            .finish()
    }
}

impl RunSettings {
    /// Merges CLI arguments over file config over defaults.
    pub fn resolve(args: &Args, file: Option<&FileConfig>) -> Result<Self> {
        let file = file.cloned().unwrap_or_default();

        let Some(token) = non_blank(args.token.as_deref()) else {
            bail!(
                "GITHUB_TOKEN is not set. Add `GITHUB_TOKEN=your_token_here` to a .env file, export it, or pass --token"
            );
        };
        let Some(account) = non_blank(args.username.as_deref()) else {
            bail!(
                "GITHUB_USERNAME is not set. Add `GITHUB_USERNAME=your_username_here` to a .env file, export it, or pass --username"
            );
        };

        let page_delay = args
            .page_delay
            .or(file.page_delay_ms)
            .map_or(DEFAULT_PAGE_DELAY, Duration::from_millis);

        Ok(Self {
            account,
            token,
            output_dir: args
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            template: args
                .template
                .clone()
                .or(file.template)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            api_base_url: args
                .api_base_url
                .clone()
                .or(file.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            page_delay,
            page_retries: args.page_retries.or(file.page_retries).unwrap_or(0),
            open_browser: !args.no_open && file.open_browser.unwrap_or(true),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}
