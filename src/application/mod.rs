//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the poll loop, dedup tracking, keyword filtering, command routing and shared state.

pub mod dedup;
pub mod filter;
pub mod mutator;
pub mod post_formatter;
pub mod poller;
pub mod registry;
pub mod router;
pub mod state;
