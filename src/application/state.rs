//! # Monitor State
//!
//! The runtime state shared by the poll loop and the command handlers: the account
//! registry, its dedup watermarks and the keyword filter. All of it sits behind a single
//! `tokio::sync::Mutex` so a registry entry and its watermark are always created and
//! destroyed together, and a cycle snapshot never observes a half-applied command.
//! The lock is only held for in-memory work, never across network calls.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::application::dedup::{Classification, DedupTracker, Fetched};
use crate::application::registry::AccountRegistry;
use crate::domain::config::MonitorConfig;
use crate::domain::handle;
use crate::domain::types::{FilterConfig, PollResult};

pub type SharedMonitor = Arc<Mutex<MonitorState>>;

/// Counters for one completed poll cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleSummary {
    pub started_at: Option<DateTime<Utc>>,
    pub duration: Duration,
    pub accounts: usize,
    pub relayed: usize,
    pub filtered: usize,
    pub baseline: usize,
    pub unchanged: usize,
    pub no_post: usize,
    pub fetch_errors: usize,
    pub delivery_errors: usize,
}

impl CycleSummary {
    pub fn record(&mut self, result: PollResult) {
        match result {
            PollResult::NoPost => self.no_post += 1,
            PollResult::Baseline => self.baseline += 1,
            PollResult::Unchanged => self.unchanged += 1,
            PollResult::NewMatched => self.relayed += 1,
            PollResult::NewFiltered => self.filtered += 1,
            PollResult::FetchError => self.fetch_errors += 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct MonitorState {
    registry: AccountRegistry,
    tracker: DedupTracker,
    pub filter: FilterConfig,
    pub cycles_completed: u64,
    pub last_cycle: Option<CycleSummary>,
}

impl MonitorState {
    pub fn new(filter: FilterConfig) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Seeds the state from the startup configuration. Returns the state and the
    /// configured handles that failed syntax validation.
    pub fn from_config(config: &MonitorConfig) -> (Self, Vec<String>) {
        let filter = FilterConfig::new(&config.keywords, config.mode, config.case_sensitive);
        let mut state = Self::new(filter);
        let mut rejected = Vec::new();
        for raw in &config.accounts {
            let handle = handle::normalize(raw);
            if !handle::is_valid(&handle) {
                rejected.push(raw.clone());
                continue;
            }
            state.register(&handle);
        }
        (state, rejected)
    }

    pub fn shared(self) -> SharedMonitor {
        Arc::new(Mutex::new(self))
    }

    /// Adds `handle` with an unknown watermark. Returns false if already registered.
    pub fn register(&mut self, handle: &str) -> bool {
        if !self.registry.insert(handle) {
            return false;
        }
        self.tracker.reset(handle);
        true
    }

    /// Removes `handle` and its watermark together.
    pub fn unregister(&mut self, handle: &str) -> bool {
        if !self.registry.remove(handle) {
            return false;
        }
        self.tracker.remove(handle);
        true
    }

    pub fn is_registered(&self, handle: &str) -> bool {
        self.registry.contains(handle)
    }

    pub fn accounts(&self) -> &[String] {
        self.registry.list()
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.registry.snapshot()
    }

    pub fn watermark(&self, handle: &str) -> Option<&str> {
        self.tracker.watermark(handle)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracker.len()
    }

    /// Feeds a fetch result to the tracker. Returns `None` when the account was
    /// unfollowed after the cycle snapshot was taken; nothing is recorded then.
    pub fn classify(&mut self, handle: &str, fetched: Fetched<'_>) -> Option<Classification> {
        if !self.registry.contains(handle) {
            return None;
        }
        Some(self.tracker.record_and_classify(handle, fetched))
    }

    pub fn finish_cycle(&mut self, summary: CycleSummary) {
        self.cycles_completed += 1;
        self.last_cycle = Some(summary);
    }
}
