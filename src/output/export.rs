// Pipe-delimited export of the full (unranked) overlap report.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::{Terminator, WriterBuilder};
use tracing::info;

use super::{build_rows, HEADERS};
use crate::analysis::pipeline::OverlapReport;

/// `<subreddit>-<start>-<end>.csv`, dates as `YYYY-MM-DD`.
pub fn csv_file_name(report: &OverlapReport) -> String {
    format!(
        "{}-{}-{}.csv",
        report.subreddit,
        report.range.start_label(),
        report.range.end_label()
    )
}

/// Write every accumulated subreddit to `dir`, in first-seen order.
///
/// Sorting and top-K don't apply here: the file is the raw data.
pub fn write_csv(report: &OverlapReport, dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        anyhow::bail!("Output directory {} does not exist", dir.display());
    }

    let path = dir.join(csv_file_name(report));

    let mut writer = WriterBuilder::new()
        .delimiter(b'|')
        .terminator(Terminator::Any(b'\n'))
        .from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record(HEADERS)?;

    let rows = build_rows(&report.accumulator);
    for row in &rows {
        let record = [
            row.subreddit.clone(),
            row.submission_count.to_string(),
            row.unique_users.to_string(),
        ];
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), rows = rows.len(), "CSV report written");

    Ok(path)
}
