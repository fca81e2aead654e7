//! # Dedup Tracker
//!
//! Per-account watermark of the last post already accounted for.
//! An account without an entry is *unknown*: its next observed post becomes the baseline
//! and is never relayed. The tracker only detects change; whether a changed post is
//! relayed is decided by the caller.

use std::collections::HashMap;

/// What a poll returned for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched<'a> {
    Post(&'a str),
    Empty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    NoPost,
    FetchError,
    Baseline,
    Unchanged,
    /// Watermark advanced to the fetched id.
    Changed,
}

#[derive(Debug, Default)]
pub struct DedupTracker {
    watermarks: HashMap<String, Option<String>>,
}

impl DedupTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `account` into the unknown state, discarding any previous watermark.
    pub fn reset(&mut self, account: &str) {
        self.watermarks.insert(account.to_string(), None);
    }

    pub fn remove(&mut self, account: &str) -> bool {
        self.watermarks.remove(account).is_some()
    }

    pub fn watermark(&self, account: &str) -> Option<&str> {
        self.watermarks.get(account).and_then(|w| w.as_deref())
    }

    pub fn len(&self) -> usize {
        self.watermarks.len()
    }

    /// Classifies a fetch result and advances the watermark on baseline or change.
    /// Empty and failed fetches leave the stored state untouched.
    pub fn record_and_classify(&mut self, account: &str, fetched: Fetched<'_>) -> Classification {
        let post_id = match fetched {
            Fetched::Empty => return Classification::NoPost,
            Fetched::Failed => return Classification::FetchError,
            Fetched::Post(id) => id,
        };

        let slot = self.watermarks.entry(account.to_string()).or_insert(None);
        if slot.is_none() {
            *slot = Some(post_id.to_string());
            return Classification::Baseline;
        }
        if slot.as_deref() == Some(post_id) {
            return Classification::Unchanged;
        }
        *slot = Some(post_id.to_string());
        Classification::Changed
    }
}
