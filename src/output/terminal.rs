// Colored terminal output for the overlap table.
//
// `format_overlap_table` builds the whole table as a string so it can be
// tested; `display_overlap_table` prints it.

use colored::Colorize;

use super::{OverlapRow, HEADERS};

/// Title shown above the table.
pub fn table_title(subreddit: &str) -> String {
    format!("Overlapping Reddit Trends for r/{subreddit}")
}

/// Build the ranked table, title included.
///
/// `found` is the number of overlapping subreddits before top-K truncation.
pub fn format_overlap_table(subreddit: &str, rows: &[OverlapRow], found: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n\n", format!("=== {} ===", table_title(subreddit)).bold()));

    if rows.is_empty() {
        if found == 0 {
            out.push_str("  No overlapping subreddits found.\n");
        } else {
            out.push_str(&format!(
                "  {found} overlapping subreddits found, none shown (top is 0).\n"
            ));
        }
        return out;
    }

    // Widest subreddit name, but never narrower than the header
    let name_width = rows
        .iter()
        .map(|r| r.subreddit.chars().count() + 2)
        .max()
        .unwrap_or(0)
        .max(HEADERS[0].len());

    out.push_str(&format!(
        "  {:>4}  {}  {}  {}\n",
        "Rank".dimmed(),
        format!("{:<name_width$}", HEADERS[0]).dimmed(),
        format!("{:>16}", HEADERS[1]).dimmed(),
        format!("{:>12}", HEADERS[2]).dimmed(),
    ));
    out.push_str(&format!("  {}\n", "-".repeat(name_width + 38).dimmed()));

    for (i, row) in rows.iter().enumerate() {
        out.push_str(&format!(
            "  {:>4}. {:<name_width$}  {:>16}  {:>12}\n",
            i + 1,
            format!("r/{}", row.subreddit),
            row.submission_count,
            row.unique_users,
        ));
    }

    out
}

/// Print the ranked overlap table.
pub fn display_overlap_table(subreddit: &str, rows: &[OverlapRow], found: usize) {
    print!("{}", format_overlap_table(subreddit, rows, found));
}
