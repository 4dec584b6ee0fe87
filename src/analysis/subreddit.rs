use anyhow::Result;

/// Normalize a user-supplied subreddit name: trim whitespace and strip a
/// leading `r/`. The result is what seed lookups, seed exclusion and the CSV
/// file name use.
///
/// Reddit names are ASCII letters, digits and underscores; anything else
/// (slashes, dots, spaces) is rejected before any request is made.
pub fn normalize_subreddit(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let name = trimmed.strip_prefix("r/").unwrap_or(trimmed);

    if name.is_empty() {
        anyhow::bail!("No subreddit name provided (got '{input}')");
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        anyhow::bail!(
            "Invalid subreddit name '{input}': '{bad}' is not allowed (letters, digits and '_' only)"
        );
    }

    Ok(name.to_string())
}
