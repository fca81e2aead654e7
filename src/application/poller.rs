//! # Poll Loop
//!
//! Periodically visits every monitored account, fetches its newest post, runs it through
//! the dedup tracker and the keyword filter, and relays genuinely new matching posts.
//!
//! Cycles run sequentially on one task. A tick that fires while a cycle is still running
//! is skipped, never queued. Each cycle iterates a snapshot of the registry taken under
//! the state lock, so a concurrent follow/unfollow is either fully visible or fully
//! deferred to the next cycle.

use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, sleep};

use crate::application::dedup::{Classification, Fetched};
use crate::application::filter;
use crate::application::state::{CycleSummary, SharedMonitor};
use crate::domain::traits::{FeedProvider, RelayTarget};
use crate::domain::types::{PollResult, Post};

/// Outcome of polling one account within a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountPoll {
    pub result: PollResult,
    pub delivery_failed: bool,
}

pub struct Poller {
    state: SharedMonitor,
    feed: Arc<dyn FeedProvider>,
    relay: Arc<dyn RelayTarget>,
    interval: Duration,
    account_delay: Duration,
}

impl Poller {
    pub fn new(
        state: SharedMonitor,
        feed: Arc<dyn FeedProvider>,
        relay: Arc<dyn RelayTarget>,
        interval: Duration,
        account_delay: Duration,
    ) -> Self {
        Self {
            state,
            feed,
            relay,
            interval,
            account_delay,
        }
    }

    /// Spawns the loop on the runtime. The first cycle starts immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(
            "Poll loop started (interval {}s, account delay {}ms)",
            self.interval.as_secs(),
            self.account_delay.as_millis()
        );
        loop {
            ticker.tick().await;
            self.run_cycle().await;
        }
    }

    pub async fn run_cycle(&self) -> CycleSummary {
        let started = Instant::now();
        let snapshot = self.state.lock().await.snapshot();

        let mut summary = CycleSummary {
            started_at: Some(Utc::now()),
            accounts: snapshot.len(),
            ..CycleSummary::default()
        };

        for (i, account) in snapshot.iter().enumerate() {
            if i > 0 && !self.account_delay.is_zero() {
                sleep(self.account_delay).await;
            }
            if let Some(poll) = self.poll_account(account).await {
                summary.record(poll.result);
                if poll.delivery_failed {
                    summary.delivery_errors += 1;
                }
            }
        }

        summary.duration = started.elapsed();
        tracing::info!(
            accounts = summary.accounts,
            relayed = summary.relayed,
            filtered = summary.filtered,
            baseline = summary.baseline,
            fetch_errors = summary.fetch_errors,
            delivery_errors = summary.delivery_errors,
            "Poll cycle finished in {}ms",
            summary.duration.as_millis()
        );

        self.state.lock().await.finish_cycle(summary.clone());
        summary
    }

    /// Polls a single account. Returns `None` if the account was unfollowed while
    /// its fetch was in flight.
    pub async fn poll_account(&self, account: &str) -> Option<AccountPoll> {
        let fetched = self.feed.fetch_newest_post(account).await;

        let (result, to_relay) = {
            let mut guard = self.state.lock().await;
            let observed = match &fetched {
                Ok(Some(post)) => Fetched::Post(&post.id),
                Ok(None) => Fetched::Empty,
                Err(_) => Fetched::Failed,
            };
            let classification = guard.classify(account, observed)?;

            match (classification, &fetched) {
                (Classification::Changed, Ok(Some(post))) => {
                    if filter::matches(&post.text, &guard.filter) {
                        (PollResult::NewMatched, Some(post))
                    } else {
                        (PollResult::NewFiltered, None)
                    }
                }
                (Classification::Changed, _) => (PollResult::NewFiltered, None),
                (Classification::Baseline, _) => (PollResult::Baseline, None),
                (Classification::Unchanged, _) => (PollResult::Unchanged, None),
                (Classification::NoPost, _) => (PollResult::NoPost, None),
                (Classification::FetchError, _) => (PollResult::FetchError, None),
            }
        };

        match result {
            PollResult::FetchError => {
                if let Err(e) = &fetched {
                    tracing::warn!("Failed to fetch newest post for {}: {:#}", account, e);
                }
            }
            PollResult::Baseline => {
                tracing::info!("Baseline recorded for {}", account);
            }
            PollResult::NewFiltered => {
                tracing::info!("New post from {} filtered out", account);
            }
            _ => tracing::debug!("{} -> {:?}", account, result),
        }

        let mut delivery_failed = false;
        if let Some(post) = to_relay {
            delivery_failed = !self.deliver(account, post).await;
        }

        Some(AccountPoll {
            result,
            delivery_failed,
        })
    }

    // Failed deliveries are not retried: the watermark has already moved past the post.
    async fn deliver(&self, account: &str, post: &Post) -> bool {
        match self.relay.relay(post).await {
            Ok(()) => {
                tracing::info!("Relayed post {} from {}", post.id, account);
                true
            }
            Err(e) => {
                tracing::error!("Failed to relay post {} from {}: {}", post.id, account, e);
                false
            }
        }
    }
}
