// Date range parsing for the seed query.
//
// Dates come in as `MM/DD/YYYY` and are pinned to midnight UTC, which is the
// clock the search API's `created_utc` timestamps use.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Input format for calendar dates on the command line.
pub const INPUT_FORMAT: &str = "%m/%d/%Y";

/// Format used when a date is shown to people or put in a filename.
pub const LABEL_FORMAT: &str = "%Y-%m-%d";

/// An inclusive pair of Unix timestamps bounding the seed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    /// Build a range from command-line strings, with "now" as the default end.
    pub fn from_args(start: &str, end: Option<&str>) -> Result<Self> {
        Self::from_args_at(start, end, Utc::now())
    }

    /// Same as `from_args`, with an explicit "now" for deterministic tests.
    pub fn from_args_at(start: &str, end: Option<&str>, now: DateTime<Utc>) -> Result<Self> {
        let start_ts = parse_date(start)
            .with_context(|| format!("Invalid start date '{start}'"))?;

        let end_ts = match end {
            Some(end) => {
                parse_date(end).with_context(|| format!("Invalid end date '{end}'"))?
            }
            None => now.timestamp(),
        };

        if start_ts > end_ts {
            anyhow::bail!(
                "Start date {} is after end date {}",
                format_timestamp(start_ts),
                format_timestamp(end_ts)
            );
        }

        Ok(Self {
            start: start_ts,
            end: end_ts,
        })
    }

    pub fn start_label(&self) -> String {
        format_timestamp(self.start)
    }

    pub fn end_label(&self) -> String {
        format_timestamp(self.end)
    }
}

/// Parse `MM/DD/YYYY` into the Unix timestamp of that day's midnight UTC.
pub fn parse_date(input: &str) -> Result<i64> {
    let input = input.trim();
    if !input.contains('/') {
        anyhow::bail!("Unsupported date format provided: expected MM/DD/YYYY");
    }

    let date = NaiveDate::parse_from_str(input, INPUT_FORMAT)
        .context("Unsupported date format provided: expected MM/DD/YYYY")?;

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("No midnight for {date}"))?;

    Ok(Utc.from_utc_datetime(&midnight).timestamp())
}

/// Render a Unix timestamp as `YYYY-MM-DD` (UTC).
pub fn format_timestamp(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format(LABEL_FORMAT).to_string())
        .unwrap_or_else(|| ts.to_string())
}
