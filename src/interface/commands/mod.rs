//! # Command Handlers
//!
//! Contains specific handler functions for each supported command (e.g., .follow, .keywords, .status).
//! These handlers are invoked by the Router.

pub mod accounts;
pub mod filter;
pub mod help;
pub mod misc;
