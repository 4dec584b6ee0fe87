use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing::info;

use subreddit_overlap::analysis::dates::DateRange;
use subreddit_overlap::analysis::pipeline::{self, AnalysisRequest, DEFAULT_SEED_LIMIT};
use subreddit_overlap::analysis::subreddit::normalize_subreddit;
use subreddit_overlap::config::Config;
use subreddit_overlap::output::{self, OutputMode, RenderOptions, Rendered, SortKey};
use subreddit_overlap::pushshift::client::SearchClient;

/// Find the subreddits where a subreddit's recent authors also post.
///
/// Pulls recent submissions from the seed subreddit, then each author's
/// submission history, and ranks the other subreddits they show up in.
#[derive(Debug, Parser)]
#[command(name = "subreddit-overlap", version, about)]
struct Cli {
    /// Subreddit to analyze (with or without the r/ prefix)
    subreddit: String,

    /// Start of the date range (MM/DD/YYYY)
    start: String,

    /// End of the date range (MM/DD/YYYY, default: now)
    end: Option<String>,

    /// Output mode: table or csv
    #[arg(long, default_value = "table")]
    output: String,

    /// Number of subreddits to show in the table (default: 5)
    #[arg(long, default_value = "5")]
    top: usize,

    /// Number of seed submissions to fetch (default: 1000)
    #[arg(long, default_value_t = DEFAULT_SEED_LIMIT)]
    submissions: u32,

    /// Rank the table by users, submissions (or posts), or subreddit
    #[arg(long, default_value = "users")]
    sort_by: SortKey,

    /// Directory the CSV file is written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Structured logging on stderr so the table on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("subreddit_overlap=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Reject an unknown output mode before spending an hour fetching
    if OutputMode::from_name(&cli.output).is_none() {
        println!("{}", output::unsupported_output_message(&cli.output));
        return Ok(());
    }

    let config = Config::load()?;
    let subreddit = normalize_subreddit(&cli.subreddit)?;
    let range = DateRange::from_args(&cli.start, cli.end.as_deref())?;

    info!(
        subreddit = %subreddit,
        start = %range.start_label(),
        end = %range.end_label(),
        output = %cli.output,
        sort_by = %cli.sort_by,
        top = cli.top,
        api = %config.api_url,
        "Configured overlap analysis"
    );

    let client = SearchClient::new(&config.api_url, config.retry.clone())?;

    let request = AnalysisRequest {
        subreddit,
        range,
        seed_limit: cli.submissions,
    };

    let report = pipeline::run(&client, &request, config.connection_cooldown).await?;

    if !report.skipped_authors.is_empty() {
        println!(
            "{} {} of {} authors skipped after connection failures",
            "Warning:".yellow(),
            report.skipped_authors.len(),
            report.seed_authors,
        );
    }

    let options = RenderOptions {
        sort_by: cli.sort_by,
        top: cli.top,
        output_dir: cli.output_dir,
    };

    match output::render(&report, &cli.output, &options)? {
        Rendered::Table { .. } => {}
        Rendered::Csv(path) => {
            println!("\n{}", format!("CSV report saved to: {}", path.display()).bold());
        }
        Rendered::Unsupported(message) => println!("{message}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("subreddit-overlap").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["rust", "01/01/2021"]).unwrap();

        assert_eq!(cli.subreddit, "rust");
        assert_eq!(cli.start, "01/01/2021");
        assert_eq!(cli.end, None);
        assert_eq!(cli.output, "table");
        assert_eq!(cli.top, 5);
        assert_eq!(cli.submissions, 1000);
        assert_eq!(cli.sort_by, SortKey::Users);
        assert_eq!(cli.output_dir, PathBuf::from("."));
    }

    #[test]
    fn test_end_and_flags() {
        let cli = parse(&[
            "r/rust",
            "01/01/2021",
            "02/01/2021",
            "--output",
            "csv",
            "--top",
            "10",
            "--submissions",
            "250",
            "--sort-by",
            "subreddit",
            "--output-dir",
            "/tmp/out",
        ])
        .unwrap();

        assert_eq!(cli.end.as_deref(), Some("02/01/2021"));
        assert_eq!(cli.output, "csv");
        assert_eq!(cli.top, 10);
        assert_eq!(cli.submissions, 250);
        assert_eq!(cli.sort_by, SortKey::Subreddit);
        assert_eq!(cli.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_sort_by_posts_is_submissions() {
        let cli = parse(&["rust", "01/01/2021", "--sort-by", "posts"]).unwrap();
        assert_eq!(cli.sort_by, SortKey::Submissions);
    }

    #[test]
    fn test_unknown_sort_by_rejected_at_parse_time() {
        let err = parse(&["rust", "01/01/2021", "--sort-by", "karma"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
        assert!(err.to_string().contains("karma"));
    }

    #[test]
    fn test_unknown_output_is_left_to_the_soft_reject() {
        let cli = parse(&["rust", "01/01/2021", "--output", "xml"]).unwrap();
        assert_eq!(OutputMode::from_name(&cli.output), None);
    }

    #[test]
    fn test_missing_start_rejected() {
        let err = parse(&["rust"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
