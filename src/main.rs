//! Sumi-Scout main entry point
//!
//! Discovered endpoints go to stdout, one per line; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use sumi_scout::cli::{normalize_args, Cli};
use sumi_scout::config::{load_config, CrawlJob, Settings};
use sumi_scout::crawl;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    setup_logging(cli.verbose, cli.quiet);

    let job = match build_job(cli) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match crawl(job, std::io::stdout()).await {
        Ok((report, _)) => {
            tracing::info!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("sumi_scout=info,warn"),
            2 => EnvFilter::new("sumi_scout=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Merges defaults, the optional config file and the flags into a job
fn build_job(cli: Cli) -> anyhow::Result<CrawlJob> {
    let base = match cli.config.as_deref() {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?
        }
        None => Settings::default(),
    };

    let settings = cli.into_settings(base)?;
    let job = CrawlJob::from_settings(&settings)?;
    Ok(job)
}
