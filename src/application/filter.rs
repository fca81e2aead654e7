//! # Keyword Filter
//!
//! Decides whether a new post is relayed, given the current `FilterConfig`.
//! Matching is plain substring search, not token search.

use crate::domain::types::{FilterConfig, FilterMode};

pub fn matches(text: &str, config: &FilterConfig) -> bool {
    if config.mode == FilterMode::None || config.keywords().is_empty() {
        return true;
    }

    let has_keyword = if config.case_sensitive {
        config.keywords().iter().any(|k| text.contains(k.as_str()))
    } else {
        let text = text.to_lowercase();
        config
            .keywords()
            .iter()
            .any(|k| text.contains(&k.to_lowercase()))
    };

    match config.mode {
        FilterMode::Include => has_keyword,
        FilterMode::Exclude => !has_keyword,
        FilterMode::None => true,
    }
}
