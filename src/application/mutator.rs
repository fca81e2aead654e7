//! # Command Mutator
//!
//! The operations privileged commands apply to the running monitor: following and
//! unfollowing accounts and adjusting the keyword filter. Every operation takes the
//! shared state lock only for the in-memory change; the remote existence check of
//! `follow` runs without it so commands stay responsive during a poll cycle.

use std::sync::Arc;
use std::time::Duration;

use crate::application::state::{CycleSummary, SharedMonitor};
use crate::domain::handle;
use crate::domain::traits::FeedProvider;
use crate::domain::types::{
    FilterMode, FollowOutcome, KeywordChange, ModeOutcome, UnfollowOutcome,
};

/// Read-only view of the monitor for `.status`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub accounts: Vec<String>,
    pub keywords: Vec<String>,
    pub mode: FilterMode,
    pub case_sensitive: bool,
    pub poll_interval: Duration,
    pub cycles_completed: u64,
    pub last_cycle: Option<CycleSummary>,
}

#[derive(Clone)]
pub struct CommandMutator {
    state: SharedMonitor,
    feed: Arc<dyn FeedProvider>,
    poll_interval: Duration,
}

impl CommandMutator {
    pub fn new(state: SharedMonitor, feed: Arc<dyn FeedProvider>, poll_interval: Duration) -> Self {
        Self {
            state,
            feed,
            poll_interval,
        }
    }

    pub async fn follow(&self, raw: &str) -> FollowOutcome {
        let handle = handle::normalize(raw);
        if !handle::is_valid(&handle) {
            return FollowOutcome::InvalidHandle(handle);
        }
        if self.state.lock().await.is_registered(&handle) {
            return FollowOutcome::AlreadyFollowed(handle);
        }

        match self.feed.profile_exists(&handle).await {
            Ok(true) => {}
            Ok(false) => return FollowOutcome::NotFound(handle),
            Err(e) => {
                tracing::warn!("Profile lookup for {} failed: {:#}", handle, e);
                return FollowOutcome::LookupFailed {
                    handle,
                    error: e.to_string(),
                };
            }
        }

        // Re-checked under the lock: another follow may have landed during the lookup.
        if !self.state.lock().await.register(&handle) {
            return FollowOutcome::AlreadyFollowed(handle);
        }
        tracing::info!("Now following {}", handle);
        FollowOutcome::Followed(handle)
    }

    pub async fn unfollow(&self, raw: &str) -> UnfollowOutcome {
        let handle = handle::normalize(raw);
        if self.state.lock().await.unregister(&handle) {
            tracing::info!("Unfollowed {}", handle);
            UnfollowOutcome::Unfollowed(handle)
        } else {
            UnfollowOutcome::NotFollowed(handle)
        }
    }

    pub async fn list_accounts(&self) -> Vec<String> {
        self.state.lock().await.snapshot()
    }

    pub async fn keywords(&self) -> Vec<String> {
        self.state.lock().await.filter.keywords().to_vec()
    }

    pub async fn add_keywords(&self, keywords: &[String]) -> KeywordChange {
        let change = self.state.lock().await.filter.add_keywords(keywords);
        if !change.changed.is_empty() {
            tracing::info!("Keywords added: {:?}", change.changed);
        }
        change
    }

    pub async fn remove_keywords(&self, keywords: &[String]) -> KeywordChange {
        let change = self.state.lock().await.filter.remove_keywords(keywords);
        if !change.changed.is_empty() {
            tracing::info!("Keywords removed: {:?}", change.changed);
        }
        change
    }

    pub async fn clear_keywords(&self) -> usize {
        let count = self.state.lock().await.filter.clear_keywords();
        tracing::info!("Cleared {} keyword(s)", count);
        count
    }

    pub async fn set_mode(&self, raw: &str) -> ModeOutcome {
        let Some(mode) = FilterMode::parse(raw) else {
            return ModeOutcome::InvalidMode(raw.trim().to_string());
        };
        self.state.lock().await.filter.mode = mode;
        tracing::info!("Filter mode set to {}", mode.as_str());
        ModeOutcome::Set(mode)
    }

    pub async fn set_case_sensitivity(&self, case_sensitive: bool) -> bool {
        self.state.lock().await.filter.case_sensitive = case_sensitive;
        tracing::info!("Case-sensitive matching: {}", case_sensitive);
        case_sensitive
    }

    pub async fn status(&self) -> StatusReport {
        let guard = self.state.lock().await;
        StatusReport {
            accounts: guard.snapshot(),
            keywords: guard.filter.keywords().to_vec(),
            mode: guard.filter.mode,
            case_sensitive: guard.filter.case_sensitive,
            poll_interval: self.poll_interval,
            cycles_completed: guard.cycles_completed,
            last_cycle: guard.last_cycle.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::poller::tests::FakeFeed;
    use crate::application::state::MonitorState;

    fn mutator(existing: &[&str]) -> (CommandMutator, SharedMonitor) {
        let feed = FakeFeed::default();
        *feed.existing.lock().unwrap() = existing.iter().map(|s| s.to_string()).collect();
        let state = MonitorState::default().shared();
        let mutator = CommandMutator::new(state.clone(), Arc::new(feed), Duration::from_secs(60));
        (mutator, state)
    }

    #[tokio::test]
    async fn test_follow_outcomes() {
        let (mutator, state) = mutator(&["alice.example"]);

        assert_eq!(
            mutator.follow("alice").await,
            FollowOutcome::InvalidHandle("alice".to_string())
        );
        assert_eq!(
            mutator.follow("ghost.example").await,
            FollowOutcome::NotFound("ghost.example".to_string())
        );
        assert_eq!(
            mutator.follow("@Alice.Example").await,
            FollowOutcome::Followed("alice.example".to_string())
        );
        assert_eq!(
            mutator.follow("alice.example").await,
            FollowOutcome::AlreadyFollowed("alice.example".to_string())
        );

        let guard = state.lock().await;
        assert_eq!(guard.accounts(), &["alice.example".to_string()]);
        assert_eq!(guard.tracked_count(), 1);
        assert_eq!(guard.watermark("alice.example"), None);
    }

    #[tokio::test]
    async fn test_unfollow_outcomes() {
        let (mutator, state) = mutator(&["alice.example"]);
        mutator.follow("alice.example").await;

        assert_eq!(
            mutator.unfollow("bob.example").await,
            UnfollowOutcome::NotFollowed("bob.example".to_string())
        );
        assert_eq!(
            mutator.unfollow("@alice.example").await,
            UnfollowOutcome::Unfollowed("alice.example".to_string())
        );
        let guard = state.lock().await;
        assert!(guard.accounts().is_empty());
        assert_eq!(guard.tracked_count(), 0);
    }

    #[tokio::test]
    async fn test_list_in_follow_order() {
        let (mutator, _state) = mutator(&["b.example", "a.example"]);
        mutator.follow("b.example").await;
        mutator.follow("a.example").await;
        assert_eq!(
            mutator.list_accounts().await,
            vec!["b.example".to_string(), "a.example".to_string()]
        );
    }

    #[tokio::test]
    async fn test_keywords_idempotent() {
        let (mutator, _state) = mutator(&[]);
        mutator.add_keywords(&["AI".to_string()]).await;
        let second = mutator.add_keywords(&["ai".to_string()]).await;
        assert!(second.changed.is_empty());
        assert_eq!(mutator.keywords().await, vec!["ai".to_string()]);

        let removed = mutator.remove_keywords(&["missing".to_string()]).await;
        assert!(removed.changed.is_empty());
        assert_eq!(mutator.clear_keywords().await, 1);
        assert!(mutator.keywords().await.is_empty());
    }

    #[tokio::test]
    async fn test_mode_and_case() {
        let (mutator, state) = mutator(&[]);
        assert_eq!(
            mutator.set_mode("sometimes").await,
            ModeOutcome::InvalidMode("sometimes".to_string())
        );
        assert_eq!(state.lock().await.filter.mode, FilterMode::None);

        assert_eq!(
            mutator.set_mode("Exclude").await,
            ModeOutcome::Set(FilterMode::Exclude)
        );
        assert!(mutator.set_case_sensitivity(true).await);

        let status = mutator.status().await;
        assert_eq!(status.mode, FilterMode::Exclude);
        assert!(status.case_sensitive);
        assert_eq!(status.poll_interval, Duration::from_secs(60));
        assert_eq!(status.cycles_completed, 0);
        assert!(status.last_cycle.is_none());
    }
}
