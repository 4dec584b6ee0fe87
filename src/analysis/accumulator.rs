// Per-subreddit accumulation of author histories.
//
// Entries are created lazily the first time a subreddit shows up and keep
// first-seen order, so the CSV export lists subreddits in discovery order.

use std::collections::{HashMap, HashSet};

use crate::pushshift::models::Submission;

/// Deduplicate submission authors, keeping first-seen order.
///
/// Records without an author have no history to fetch and are left out.
pub fn unique_authors(submissions: &[Submission]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    submissions
        .iter()
        .filter_map(|s| s.author.as_deref())
        .filter(|author| seen.insert(author))
        .map(str::to_string)
        .collect()
}

/// What the seed authors did in one subreddit.
#[derive(Debug, Clone, Default)]
pub struct SubredditActivity {
    pub submissions: Vec<Submission>,
    pub authors: HashSet<String>,
}

impl SubredditActivity {
    pub fn submission_count(&self) -> usize {
        self.submissions.len()
    }

    pub fn unique_users(&self) -> usize {
        self.authors.len()
    }
}

/// Subreddit name → activity, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct SubredditAccumulator {
    entries: Vec<(String, SubredditActivity)>,
    index: HashMap<String, usize>,
}

impl SubredditAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one submission from `author`'s history into the accumulator.
    ///
    /// Returns false (and changes nothing) when the submission has no
    /// subreddit, which is how promoted and removed posts come back.
    pub fn record(&mut self, author: &str, submission: &Submission) -> bool {
        let Some(subreddit) = submission.subreddit.as_deref() else {
            return false;
        };

        let slot = match self.index.get(subreddit) {
            Some(&i) => i,
            None => {
                self.entries
                    .push((subreddit.to_string(), SubredditActivity::default()));
                let i = self.entries.len() - 1;
                self.index.insert(subreddit.to_string(), i);
                i
            }
        };

        let activity = &mut self.entries[slot].1;
        activity.submissions.push(submission.clone());
        if !activity.authors.contains(author) {
            activity.authors.insert(author.to_string());
        }
        true
    }

    /// Drop a subreddit, keeping the order of the rest.
    ///
    /// Names compare case-insensitively, as Reddit's do, so `r/rust` typed on
    /// the command line also removes the API's `Rust`.
    pub fn remove(&mut self, subreddit: &str) -> Option<SubredditActivity> {
        let slot = self
            .entries
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(subreddit))?;
        let (name, activity) = self.entries.remove(slot);
        self.index.remove(&name);
        for i in self.index.values_mut() {
            if *i > slot {
                *i -= 1;
            }
        }
        Some(activity)
    }

    pub fn get(&self, subreddit: &str) -> Option<&SubredditActivity> {
        self.index.get(subreddit).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, subreddit: &str) -> bool {
        self.index.contains_key(subreddit)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SubredditActivity)> {
        self.entries.iter().map(|(name, a)| (name.as_str(), a))
    }
}
