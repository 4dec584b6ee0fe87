// Overlap pipeline: seed subreddit → authors → author histories → accumulator.
//
// Strictly sequential. Each author's history is one blocking-style request;
// a connection failure costs that author (after a cooldown) but not the run.
// Any other fetch error aborts.

use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use super::accumulator::{unique_authors, SubredditAccumulator};
use super::dates::DateRange;
use crate::pushshift::client::SearchClient;
use crate::pushshift::models::SearchQuery;

/// Default number of seed submissions to request.
pub const DEFAULT_SEED_LIMIT: u32 = 1000;

/// Default wait after a connection failure before moving to the next author.
pub const DEFAULT_CONNECTION_COOLDOWN: Duration = Duration::from_secs(54);

/// What to analyze.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    /// Already normalized (no `r/` prefix).
    pub subreddit: String,
    pub range: DateRange,
    pub seed_limit: u32,
}

/// The result of a full run, ready for rendering.
#[derive(Debug, Clone)]
pub struct OverlapReport {
    pub subreddit: String,
    pub range: DateRange,
    pub seed_authors: usize,
    pub skipped_authors: Vec<String>,
    /// Never contains the seed subreddit.
    pub accumulator: SubredditAccumulator,
}

/// Seed phase: fetch the subreddit's posts in range and collect their authors.
pub async fn collect_seed_authors(
    client: &SearchClient,
    request: &AnalysisRequest,
) -> Result<Vec<String>> {
    let query = SearchQuery::for_subreddit(&request.subreddit)
        .between(request.range.start, request.range.end)
        .limit(request.seed_limit);

    let submissions = client
        .fetch(&query)
        .await
        .with_context(|| format!("Failed to fetch seed submissions for r/{}", request.subreddit))?;

    let authors = unique_authors(&submissions);
    info!(
        submissions = submissions.len(),
        authors = authors.len(),
        subreddit = %request.subreddit,
        "Seed phase complete"
    );

    Ok(authors)
}

/// Expansion phase: fold every author's history into a fresh accumulator.
///
/// Returns the accumulator and the authors skipped after connection failures.
pub async fn expand_authors(
    client: &SearchClient,
    authors: &[String],
    connection_cooldown: Duration,
) -> Result<(SubredditAccumulator, Vec<String>)> {
    let mut accumulator = SubredditAccumulator::new();
    let mut skipped = Vec::new();

    let pb = ProgressBar::new(authors.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Authors [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    for author in authors {
        let history = match client.fetch(&SearchQuery::for_author(author)).await {
            Ok(history) => history,
            Err(e) if e.is_connection() => {
                warn!(
                    author = %author,
                    error = %e,
                    cooldown_secs = connection_cooldown.as_secs(),
                    "Connection failed, skipping author after cooldown"
                );
                tokio::time::sleep(connection_cooldown).await;
                skipped.push(author.clone());
                pb.inc(1);
                continue;
            }
            Err(e) => {
                pb.finish_and_clear();
                return Err(e).with_context(|| format!("Failed to fetch history for u/{author}"));
            }
        };

        let mut promoted = 0usize;
        for submission in &history {
            if !accumulator.record(author, submission) {
                promoted += 1;
            }
        }
        if promoted > 0 {
            info!(author = %author, skipped = promoted, "Skipped submissions without a subreddit");
        }

        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok((accumulator, skipped))
}

/// Run seed and expansion phases and drop the seed subreddit from the result.
pub async fn run(
    client: &SearchClient,
    request: &AnalysisRequest,
    connection_cooldown: Duration,
) -> Result<OverlapReport> {
    println!("Starting overlap analysis for r/{}.", request.subreddit);

    let authors = collect_seed_authors(client, request).await?;

    println!("Getting submission history for {} users.", authors.len());
    println!("Go grab some coffee. This is going to be a while.");

    let (mut accumulator, skipped_authors) =
        expand_authors(client, &authors, connection_cooldown).await?;

    // Every seed author trivially overlaps with the seed itself
    while accumulator.remove(&request.subreddit).is_some() {}

    if !skipped_authors.is_empty() {
        warn!(
            count = skipped_authors.len(),
            "Some authors were skipped after connection failures"
        );
    }

    Ok(OverlapReport {
        subreddit: request.subreddit.clone(),
        range: request.range,
        seed_authors: authors.len(),
        skipped_authors,
        accumulator,
    })
}
