//! CLI for stale-audit.
//!
//! Scans GitHub organizations for stale pull requests and branches and prints
//! them grouped by the responsible user.

use clap::Parser;
use stale_audit::{
    parse_name_list, ConfigFile, Flagged, GitHubRunner, RunnerConfig, RunnerError, ScanReport,
    Settings, UserBuckets,
};
use stale_audit::{DecoratedBranch, PullRequestRecord};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Stale Audit - Find stale pull requests and branches across GitHub organizations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Organization(s) to check, comma separated.
    #[arg(long)]
    owners: Option<String>,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// GitHub API URL (for GitHub Enterprise).
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Path to a stale-audit.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Branches to ignore, comma separated [default: master,develop].
    #[arg(long)]
    ignore_branches: Option<String>,

    /// Regular expression repository names must match [default: .*].
    #[arg(long)]
    repo_pattern: Option<String>,

    /// Number of inactive days to consider a PR stale [default: 14].
    #[arg(long)]
    pr_stale_days: Option<u32>,

    /// Number of inactive days to consider a branch stale [default: 14].
    #[arg(long)]
    branch_stale_days: Option<u32>,

    /// Days before the stale cutoff at which to start alerting [default: 7].
    #[arg(long)]
    alert_days: Option<u32>,

    /// Don't report branches that back an open pull request.
    #[arg(long)]
    exempt_pr_branches: bool,

    /// Also scan archived repositories.
    #[arg(long)]
    include_archived: bool,

    /// Maximum repositories scanned concurrently [default: 5].
    #[arg(long)]
    concurrency: Option<usize>,

    /// Records requested per page, 1-100 [default: 100].
    #[arg(long)]
    per_page: Option<u8>,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();
    let json = args.json;

    // Run the main logic
    match run(args).await {
        Ok(report) => {
            if json {
                match report.to_json() {
                    Ok(output) => println!("{output}"),
                    Err(e) => {
                        error!(error = %e, "Failed to serialize report");
                        return ExitCode::from(2);
                    }
                }
            } else {
                print_report(&report);
            }

            if report.summary.all_success() {
                ExitCode::from(0)
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Logs go to stderr so `--json` output on stdout stays machine-readable.
/// Log level filtering comes from the `RUST_LOG` env var (defaults to "info").
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Resolves settings: defaults, then config file, then command line.
fn resolve_settings(args: &Args) -> Result<Settings, RunnerError> {
    let mut settings = Settings::default();

    if let Some(path) = &args.config {
        settings.merge_file(ConfigFile::load(path)?);
    }

    if let Some(owners) = &args.owners {
        settings.organizations = owners.split(',').map(str::to_string).collect();
    }
    if let Some(names) = &args.ignore_branches {
        settings.ignore_branches = parse_name_list(names).into_iter().collect();
    }
    if let Some(pattern) = &args.repo_pattern {
        settings.repo_pattern = pattern.clone();
    }
    if let Some(days) = args.pr_stale_days {
        settings.pr_stale_days = days;
    }
    if let Some(days) = args.branch_stale_days {
        settings.branch_stale_days = days;
    }
    if let Some(days) = args.alert_days {
        settings.alert_days = days;
    }
    if args.exempt_pr_branches {
        settings.exempt_pr_branches = true;
    }
    if args.include_archived {
        settings.include_archived = true;
    }
    if args.api_url.is_some() {
        settings.api_url = args.api_url.clone();
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    if let Some(per_page) = args.per_page {
        settings.per_page = per_page;
    }

    Ok(settings)
}

/// Main execution logic.
async fn run(args: Args) -> Result<ScanReport, RunnerError> {
    let settings = resolve_settings(&args)?;
    let config = RunnerConfig::new(args.token, settings.policy()?, settings.scan_config()?)
        .with_api_url(settings.api_url()?);
    let runner = GitHubRunner::new(config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight requests");
            on_signal.cancel();
        }
    });

    runner.run(cancel).await
}

/// Prints the four buckets followed by the run summary.
fn print_report(report: &ScanReport) {
    let result = &report.result;

    println!("\n1. Stale pull requests (closure pending)");
    print_pull_requests(&result.stale_pull_requests);

    println!("\n2. Pull requests reaching stale");
    print_pull_requests(&result.alerting_pull_requests);

    println!("\n3. Stale branches");
    print_branches(&result.stale_branches);

    println!("\n4. Branches reaching stale");
    print_branches(&result.alerting_branches);

    let summary = &report.summary;
    println!("\nSummary:");
    println!("  Organizations scanned: {}", summary.organizations_scanned);
    println!("  Organizations failed: {}", summary.organizations_failed);
    println!("  Repositories discovered: {}", summary.repositories_discovered);
    println!("  Repositories filtered: {}", summary.repositories_filtered);
    println!("  Repositories scanned: {}", summary.repositories_scanned);
    println!("  Repositories failed: {}", summary.repositories_failed);
    println!("  Pull requests examined: {}", summary.pull_requests_examined);
    println!("  Branches examined: {}", summary.branches_examined);
    println!("  Branches unresolved: {}", summary.branches_unresolved);
    if summary.cancelled {
        println!("  Cancelled: {} repositories not scanned", summary.repositories_cancelled);
    }
    for failed in report.failed() {
        println!("  Failed: {}", failed.repository());
    }
}

fn print_pull_requests(buckets: &UserBuckets<PullRequestRecord>) {
    if buckets.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "  {:<20} {:<30} {:>6}  {:<40} {:<25} {:>9}  Link",
        "User", "Repository", "Number", "Title", "Last Updated", "Days Left"
    );
    for (user, entries) in buckets {
        for Flagged {
            record,
            days_until_stale,
            ..
        } in entries
        {
            println!(
                "  {:<20} {:<30} {:>6}  {:<40} {:<25} {:>9}  {}",
                user,
                record.repository.full_name(),
                record.number,
                truncate(&record.title, 40),
                record.updated_at.format("%Y-%m-%d %H:%M UTC"),
                days_until_stale,
                record.url
            );
        }
    }
}

fn print_branches(buckets: &UserBuckets<DecoratedBranch>) {
    if buckets.is_empty() {
        println!("  (none)");
        return;
    }
    println!(
        "  {:<20} {:<30} {:<40} {:<25} {:>9}  Link",
        "User", "Repository", "Branch", "Last Updated", "Days Left"
    );
    for (user, entries) in buckets {
        for Flagged {
            record,
            days_until_stale,
            ..
        } in entries
        {
            println!(
                "  {:<20} {:<30} {:<40} {:<25} {:>9}  {}",
                user,
                record.branch.repository.full_name(),
                truncate(&record.branch.name, 40),
                record.commit.timestamp.format("%Y-%m-%d %H:%M UTC"),
                days_until_stale,
                record.branch.url
            );
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}
