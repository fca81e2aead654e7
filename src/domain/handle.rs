//! # Account Handles
//!
//! Syntax rules for monitored account handles (`alice.bsky.social`).
//! Checked locally before any network lookup.

use regex::Regex;
use std::sync::LazyLock;

pub const MIN_HANDLE_LEN: usize = 3;

// At least one '.' separating non-empty, whitespace-free labels.
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s.]+(\.[^\s.]+)+$").expect("static handle regex"));

/// Strips a leading `@` and lowercases. Handles are case-insensitive.
pub fn normalize(raw: &str) -> String {
    raw.trim().trim_start_matches('@').to_lowercase()
}

pub fn is_valid(handle: &str) -> bool {
    handle.len() >= MIN_HANDLE_LEN && HANDLE_RE.is_match(handle)
}

/// Record key of an AT URI (`at://did/collection/rkey`).
pub fn rkey(uri: &str) -> Option<&str> {
    uri.rsplit('/').next().filter(|s| !s.is_empty() && !s.starts_with("at:"))
}
