use chrono::Utc;
use clap::Parser;
use colored::Colorize;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use ccquota::constants::{DEFAULT_PROVIDER, LOG_ENV};
use ccquota::report::render_terminal_report;
use ccquota::{CredentialLocator, FailureKind, QuotaConfig, QuotaError, QuotaFetcher, QuotaOutcome};

const EXIT_CREDENTIALS: u8 = 1;
const EXIT_FETCH_FAILED: u8 = 2;
const EXIT_USAGE: u8 = 64;

#[derive(Parser, Debug)]
#[command(name = "ccquota")]
#[command(about = "Show Claude subscription quota (5-hour and 7-day windows)")]
#[command(version)]
struct Cli {
    /// JSON config file (progressBarWidth, ...)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Credential entry to use
    #[arg(long, default_value = DEFAULT_PROVIDER)]
    provider: String,
}

/// Help and version requests succeed, anything else is a usage error
fn parse_error_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_USAGE } else { 0 }
}

fn exit_code(outcome: &QuotaOutcome) -> u8 {
    match outcome {
        QuotaOutcome::Available(_) => 0,
        QuotaOutcome::Unavailable(err) if err.kind() == FailureKind::CredentialUnavailable => {
            EXIT_CREDENTIALS
        }
        QuotaOutcome::Unavailable(_) => EXIT_FETCH_FAILED,
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// "message: cause: cause"
fn describe(err: &QuotaError) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(&format!(": {}", cause));
        source = cause.source();
    }
    text
}

fn print_failure(err: &QuotaError, locator: &CredentialLocator) {
    if err.kind() == FailureKind::CredentialUnavailable {
        eprintln!("{} {}", "❌".red(), describe(err));
        eprintln!(
            "   Expected an OAuth '{}' entry in {}",
            locator.provider(),
            locator.resolve().path().display()
        );
    } else if err.is_unauthorized() {
        eprintln!(
            "{} Unauthorized by the usage API; log in to Claude again",
            "❌".red()
        );
    } else {
        eprintln!("{} Failed to fetch usage: {}", "❌".red(), describe(err));
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(parse_error_exit_code(&err));
        }
    };

    init_logging();

    let config = match &cli.config {
        Some(path) => match QuotaConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{} {}", "❌".red(), describe(&err));
                return ExitCode::from(EXIT_USAGE);
            }
        },
        None => QuotaConfig::default(),
    };

    let locator = CredentialLocator::default().with_provider(cli.provider);
    let fetcher = match QuotaFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(err) => {
            eprintln!("{} {}", "❌".red(), describe(&err));
            return ExitCode::from(EXIT_FETCH_FAILED);
        }
    };

    let outcome = fetcher.fetch_quota(&locator).await;
    match &outcome {
        QuotaOutcome::Available(snapshot) => print!(
            "{}",
            render_terminal_report(snapshot, config.progress_bar_width, Utc::now())
        ),
        QuotaOutcome::Unavailable(err) => print_failure(err, &locator),
    }
    ExitCode::from(exit_code(&outcome))
}
