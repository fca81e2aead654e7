//! # Infrastructure Layer
//!
//! Handles interactions with external systems and services.
//! Implements the traits defined in the Domain layer (ChatProvider, FeedProvider, RelayTarget).

pub mod bluesky;
pub mod logging;
pub mod matrix;
