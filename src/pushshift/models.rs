// Serde types for the submission search endpoint, plus the query builder.

use serde::Deserialize;

/// Page size the API is asked for when a query doesn't set one.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// A submission record as returned by the search API.
///
/// Only `author` and `subreddit` drive the analysis. The rest is kept for
/// debugging and logging. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Submission {
    /// Absent or null on some promoted and deleted records.
    #[serde(default)]
    pub author: Option<String>,
    /// Absent on promoted and removed content.
    #[serde(default)]
    pub subreddit: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_utc: Option<i64>,
    #[serde(default)]
    pub promoted: Option<bool>,
}

/// Top-level search response: `{"data": [...]}`.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub data: Vec<Submission>,
}

/// Filters for one `reddit/search/submission` request.
///
/// Every filter is optional; unset filters are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub subreddit: Option<String>,
    pub author: Option<String>,
    /// Lower timestamp bound (Unix seconds).
    pub after: Option<i64>,
    /// Upper timestamp bound (Unix seconds).
    pub before: Option<i64>,
    pub size: Option<u32>,
}

impl SearchQuery {
    pub fn for_subreddit(name: &str) -> Self {
        Self {
            subreddit: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn for_author(name: &str) -> Self {
        Self {
            author: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn between(mut self, after: i64, before: i64) -> Self {
        self.after = Some(after);
        self.before = Some(before);
        self
    }

    pub fn limit(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Query-string pairs in the order the API documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref subreddit) = self.subreddit {
            params.push(("subreddit", subreddit.clone()));
        }
        if let Some(after) = self.after {
            params.push(("after", after.to_string()));
        }
        if let Some(before) = self.before {
            params.push(("before", before.to_string()));
        }
        params.push((
            "size",
            self.size.unwrap_or(DEFAULT_PAGE_SIZE).to_string(),
        ));
        if let Some(ref author) = self.author {
            params.push(("author", author.clone()));
        }
        params
    }
}
