//! # Domain Traits
//!
//! Abstract interfaces for the external collaborators (Chat, Feed, Relay).
//! Allows for pluggable implementations in the Infrastructure layer.

use crate::domain::types::Post;
use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix, Slack, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<(), String>;

    /// Send a notice (rendered as bot output by clients)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Abstract interface for the social feed platform.
#[async_trait]
pub trait FeedProvider: Send + Sync {
    /// Whether a profile with this handle exists.
    async fn profile_exists(&self, handle: &str) -> anyhow::Result<bool>;

    /// The newest post of `handle`, or `None` if the account has no posts.
    async fn fetch_newest_post(&self, handle: &str) -> anyhow::Result<Option<Post>>;
}

/// Destination that matched posts are forwarded to.
#[async_trait]
pub trait RelayTarget: Send + Sync {
    async fn relay(&self, post: &Post) -> Result<(), String>;
}
