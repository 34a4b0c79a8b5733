//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Find out who follows you back on GitHub.
///
/// Fetches the followers and following lists of an account, works out mutual
/// and one-way relationships, and writes JSON, text, and HTML reports.
/// Credentials are read from the environment or a `.env` file.
#[derive(Parser)]
#[command(name = "followgraph")]
#[command(author, version, about)]
pub struct Args {
    /// Account to analyze
    #[arg(short = 'u', long, env = "GITHUB_USERNAME")]
    pub username: Option<String>,

    /// Personal access token sent as a bearer credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Directory for generated reports [default: github-analysis-results]
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// HTML report template [default: templates/report.html]
    #[arg(short = 't', long)]
    pub template: Option<PathBuf>,

    /// API base URL [default: https://api.github.com]
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Delay between page requests in milliseconds (0-60000) [default: 100]
    #[arg(short = 'd', long, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub page_delay: Option<u64>,

    /// Extra attempts for a page that fails transiently (0-5) [default: 0]
    #[arg(short = 'r', long, value_parser = clap::value_parser!(u32).range(0..=5))]
    pub page_retries: Option<u32>,

    /// Do not open the HTML report in a browser
    #[arg(long)]
    pub no_open: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/followgraph/config.toml)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("username", &self.username)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("output_dir", &self.output_dir)
            .field("template", &self.template)
            .field("api_base_url", &self.api_base_url)
            .field("page_delay", &self.page_delay)
            .field("page_retries", &self.page_retries)
            .field("no_open", &self.no_open)
            .field("config", &self.config)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .finish()
    }
}
