//! CLI entry point for the followgraph tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use followgraph_core::{
    AccountSnapshot, AnalyzeError, ApiClient, ApiClientConfig, ArtifactKind, CollectorConfig,
    DirectorySink, FileTemplateSource, FollowGraph, PageRetryPolicy, ReportOutcome,
    assemble_snapshot, write_reports,
};
use tracing::{debug, error, info, warn};

mod app_config;
mod cli;
mod exit_handler;

use app_config::{RunSettings, load_file_config};
use cli::Args;
use exit_handler::{ProcessExit, determine_exit_outcome};

/// Number of one-way-out accounts listed on the console.
const CONSOLE_PREVIEW_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so GITHUB_TOKEN / GITHUB_USERNAME feed clap's env fallbacks.
    let dotenv_path = dotenvy::dotenv().ok();

    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = dotenv_path {
        debug!(path = %path.display(), "loaded .env");
    }
    debug!(?args, "CLI arguments parsed");

    match run(&args).await {
        Ok(exit) => exit.into(),
        Err(err) => {
            error!("{err:#}");
            ProcessExit::Failure.into()
        }
    }
}

async fn run(args: &Args) -> Result<ProcessExit> {
    let file_config = load_file_config(args.config.as_deref())?;
    let settings = RunSettings::resolve(args, file_config.as_ref())?;
    debug!(?settings, "settings resolved");

    let client = ApiClient::new(
        ApiClientConfig::new(settings.token.clone()).with_base_url(settings.api_base_url.clone()),
    )
    .context("Failed to set up the API client")?;
    let collector_config = CollectorConfig {
        page_delay: settings.page_delay,
        retry: PageRetryPolicy::with_max_retries(settings.page_retries),
        ..CollectorConfig::default()
    };
    let graph = FollowGraph::new(client, collector_config);

    info!(account = %settings.account, "Starting follower analysis");
    let snapshot = match graph.analyze(&settings.account).await {
        Ok(snapshot) => snapshot,
        Err(err) => return Err(explain_analyze_error(err)),
    };

    if !args.quiet {
        print_summary(&snapshot);
    }

    let payload = assemble_snapshot(&snapshot, Utc::now());
    let sink = DirectorySink::new(&settings.output_dir, payload.generated_at);
    let templates = FileTemplateSource::new(&settings.template);
    let outcome = write_reports(&payload, &templates, &sink);

    print_outcome(&outcome);

    if settings.open_browser
        && let Some(html) = outcome.path_of(ArtifactKind::Html)
    {
        match open::that(html) {
            Ok(()) => info!("HTML report opened in default browser"),
            Err(e) => warn!(error = %e, path = %html.display(), "Could not open browser"),
        }
    }

    Ok(determine_exit_outcome(outcome.succeeded(), outcome.failures()))
}

/// Adds an actionable hint to analysis failures the user can fix.
fn explain_analyze_error(err: AnalyzeError) -> anyhow::Error {
    let hint = match &err {
        AnalyzeError::Join { source, .. } if source.is_quota_exhausted() => {
            Some("API rate limit exhausted; wait for the hourly quota to reset and retry")
        }
        AnalyzeError::Join { source, .. } if source.status() == Some(401) => {
            Some("the token was rejected; check GITHUB_TOKEN")
        }
        AnalyzeError::Join { source, .. } if source.status() == Some(404) => {
            Some("the account was not found; check GITHUB_USERNAME")
        }
        _ => None,
    };
    let err = anyhow::Error::new(err).context("Analysis failed");
    match hint {
        Some(hint) => err.context(hint),
        None => err,
    }
}

fn print_summary(snapshot: &AccountSnapshot) {
    let analysis = &snapshot.analysis;
    println!("Analysis for @{}", snapshot.account);
    println!("  Followers:             {}", snapshot.followers.len());
    println!("  Following:             {}", snapshot.following.len());
    println!("  Mutual:                {}", analysis.mutual.len());
    println!("  Don't follow back:     {}", analysis.one_way_out.len());
    println!("  You don't follow back: {}", analysis.one_way_in.len());
    if snapshot.partial {
        println!("  (partial data: a list could not be fetched completely)");
    }

    if !analysis.one_way_out.is_empty() {
        println!();
        println!("People you follow who don't follow back:");
        for entity in analysis.one_way_out.iter().take(CONSOLE_PREVIEW_LIMIT) {
            println!("  @{} - {}", entity.handle, entity.profile_url);
        }
        if analysis.one_way_out.len() > CONSOLE_PREVIEW_LIMIT {
            println!(
                "  ... and {} more",
                analysis.one_way_out.len() - CONSOLE_PREVIEW_LIMIT
            );
        }
    }
    println!();
}

fn print_outcome(outcome: &ReportOutcome) {
    for kind in ArtifactKind::ALL {
        if let Some(path) = outcome.path_of(kind) {
            info!(format = %kind, path = %path.display(), "Report saved");
        }
    }
    for failed in &outcome.failed {
        error!(format = %failed.kind, error = %failed.error, "Report not generated");
    }
    info!(
        written = outcome.succeeded(),
        failed = outcome.failures(),
        total = ArtifactKind::ALL.len(),
        "{} of {} reports written",
        outcome.succeeded(),
        ArtifactKind::ALL.len()
    );
}
