// Output — ranking rows, terminal table, pipe-delimited export.

pub mod export;
pub mod terminal;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;

use crate::analysis::accumulator::SubredditAccumulator;
use crate::analysis::pipeline::OverlapReport;

/// Column headers shared by the table and the CSV export.
pub const HEADERS: [&str; 3] = ["Subreddit", "Submission Count", "Unique Users"];

/// Where the report goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Csv,
}

impl OutputMode {
    /// Case-insensitive lookup. `None` for anything unsupported.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// The message given back for an unknown output mode.
pub fn unsupported_output_message(name: &str) -> String {
    format!("Unsupported output type '{name}' (expected 'table' or 'csv')")
}

/// Column the table is ranked by (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Users,
    Submissions,
    Subreddit,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "users" => Ok(Self::Users),
            "submissions" | "posts" => Ok(Self::Submissions),
            "subreddit" => Ok(Self::Subreddit),
            _ => Err(format!(
                "Unsupported sort_by value provided: '{s}' (expected users, submissions, posts, or subreddit)"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Users => "users",
            Self::Submissions => "submissions",
            Self::Subreddit => "subreddit",
        };
        f.write_str(name)
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapRow {
    pub subreddit: String,
    pub submission_count: usize,
    pub unique_users: usize,
}

/// Rows in accumulator (first-seen) order.
pub fn build_rows(accumulator: &SubredditAccumulator) -> Vec<OverlapRow> {
    accumulator
        .iter()
        .map(|(name, activity)| OverlapRow {
            subreddit: name.to_string(),
            submission_count: activity.submission_count(),
            unique_users: activity.unique_users(),
        })
        .collect()
}

/// Sort rows descending by `key` and keep the first `top`.
///
/// The sort is stable, so ties stay in first-seen order.
pub fn rank(mut rows: Vec<OverlapRow>, key: SortKey, top: usize) -> Vec<OverlapRow> {
    match key {
        SortKey::Users => rows.sort_by(|a, b| b.unique_users.cmp(&a.unique_users)),
        SortKey::Submissions => rows.sort_by(|a, b| b.submission_count.cmp(&a.submission_count)),
        SortKey::Subreddit => rows.sort_by(|a, b| b.subreddit.cmp(&a.subreddit)),
    }
    rows.truncate(top);
    rows
}

/// Options for the render phase.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub sort_by: SortKey,
    pub top: usize,
    /// Directory the CSV export is written to.
    pub output_dir: PathBuf,
}

/// What rendering did.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// The ranked table was printed to stdout.
    Table { rows: usize },
    /// The CSV file was written at this path.
    Csv(PathBuf),
    /// Unknown output mode. Nothing was printed or written.
    Unsupported(String),
}

/// Render phase: print the ranked table or write the CSV file.
///
/// An unknown `output` is not an error: it comes back as
/// `Rendered::Unsupported` with a message, and has no side effects.
pub fn render(report: &OverlapReport, output: &str, options: &RenderOptions) -> Result<Rendered> {
    let Some(mode) = OutputMode::from_name(output) else {
        return Ok(Rendered::Unsupported(unsupported_output_message(output)));
    };

    match mode {
        OutputMode::Table => {
            let found = report.accumulator.len();
            let rows = rank(build_rows(&report.accumulator), options.sort_by, options.top);
            terminal::display_overlap_table(&report.subreddit, &rows, found);
            Ok(Rendered::Table { rows: rows.len() })
        }
        OutputMode::Csv => {
            let path = export::write_csv(report, Path::new(&options.output_dir))?;
            Ok(Rendered::Csv(path))
        }
    }
}
