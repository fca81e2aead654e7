//! # Interface Layer
//!
//! User-facing entry points: chat command handlers invoked by the Router.

pub mod commands;
