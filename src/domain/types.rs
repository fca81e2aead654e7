//! # Domain Types
//!
//! Common data structures and enums used across the application logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single post fetched from the feed platform.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    /// Stable identifier (AT URI). Used as the dedup watermark.
    pub id: String,
    pub text: String,
    pub author_handle: String,
    pub author_display_name: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Public web link to the post.
    pub url: String,
    pub media: Option<PostMedia>,
    pub is_repost: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostMedia {
    pub images: Vec<ImageRef>,
    pub external: Option<ExternalLink>,
}

impl PostMedia {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.external.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExternalLink {
    pub uri: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Relay every post.
    #[default]
    None,
    /// Relay only posts containing at least one keyword.
    Include,
    /// Relay only posts containing none of the keywords.
    Exclude,
}

impl FilterMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "all" => Some(Self::None),
            "include" | "whitelist" => Some(Self::Include),
            "exclude" | "blacklist" => Some(Self::Exclude),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

/// Keyword filter applied to every genuinely new post.
///
/// Keywords are stored lowercased and deduplicated in insertion order.
/// Case folding of the post text happens at evaluation time only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    keywords: Vec<String>,
    pub mode: FilterMode,
    pub case_sensitive: bool,
}

/// Result of a keyword add/remove: which keywords actually changed the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordChange {
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
}

impl FilterConfig {
    pub fn new(keywords: &[String], mode: FilterMode, case_sensitive: bool) -> Self {
        let mut config = Self {
            keywords: Vec::new(),
            mode,
            case_sensitive,
        };
        config.add_keywords(keywords);
        config
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Adds keywords; already-present and blank entries are no-ops.
    pub fn add_keywords<S: AsRef<str>>(&mut self, keywords: &[S]) -> KeywordChange {
        let mut change = KeywordChange::default();
        for raw in keywords {
            let keyword = normalize_keyword(raw.as_ref());
            if keyword.is_empty() {
                continue;
            }
            if self.keywords.contains(&keyword) {
                change.unchanged.push(keyword);
            } else {
                self.keywords.push(keyword.clone());
                change.changed.push(keyword);
            }
        }
        change
    }

    /// Removes keywords; absent entries are no-ops.
    pub fn remove_keywords<S: AsRef<str>>(&mut self, keywords: &[S]) -> KeywordChange {
        let mut change = KeywordChange::default();
        for raw in keywords {
            let keyword = normalize_keyword(raw.as_ref());
            if keyword.is_empty() {
                continue;
            }
            if let Some(pos) = self.keywords.iter().position(|k| *k == keyword) {
                self.keywords.remove(pos);
                change.changed.push(keyword);
            } else {
                change.unchanged.push(keyword);
            }
        }
        change
    }

    /// Removes every keyword, returning how many were dropped.
    pub fn clear_keywords(&mut self) -> usize {
        let count = self.keywords.len();
        self.keywords.clear();
        count
    }
}

fn normalize_keyword(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Per-account, per-cycle outcome of polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    NoPost,
    Baseline,
    Unchanged,
    NewMatched,
    NewFiltered,
    FetchError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FollowOutcome {
    Followed(String),
    AlreadyFollowed(String),
    InvalidHandle(String),
    NotFound(String),
    /// The existence check itself failed (network, upstream error).
    LookupFailed { handle: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UnfollowOutcome {
    Unfollowed(String),
    NotFollowed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModeOutcome {
    Set(FilterMode),
    InvalidMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(FilterMode::parse("include"), Some(FilterMode::Include));
        assert_eq!(FilterMode::parse(" EXCLUDE "), Some(FilterMode::Exclude));
        assert_eq!(FilterMode::parse("none"), Some(FilterMode::None));
        assert_eq!(FilterMode::parse("maybe"), None);
        assert_eq!(FilterMode::Include.as_str(), "include");
    }

    #[test]
    fn test_add_keywords_idempotent() {
        let mut config = FilterConfig::default();
        let first = config.add_keywords(&["ai"]);
        let second = config.add_keywords(&["ai"]);
        assert_eq!(config.keywords(), &["ai".to_string()]);
        assert_eq!(first.changed, vec!["ai"]);
        assert!(second.changed.is_empty());
        assert_eq!(second.unchanged, vec!["ai"]);
    }

    #[test]
    fn test_add_keywords_lowercases_and_skips_blank() {
        let mut config = FilterConfig::default();
        config.add_keywords(&["Rust", "  ", "RUST", "Tokio"]);
        assert_eq!(config.keywords(), &["rust".to_string(), "tokio".to_string()]);
    }

    #[test]
    fn test_remove_absent_keyword_is_noop() {
        let mut config = FilterConfig::new(&["ai".to_string()], FilterMode::Include, false);
        let change = config.remove_keywords(&["ml"]);
        assert!(change.changed.is_empty());
        assert_eq!(change.unchanged, vec!["ml"]);
        assert_eq!(config.keywords().len(), 1);

        let change = config.remove_keywords(&["AI"]);
        assert_eq!(change.changed, vec!["ai"]);
        assert!(config.keywords().is_empty());
    }

    #[test]
    fn test_clear_keywords() {
        let mut config = FilterConfig::new(
            &["a".to_string(), "b".to_string()],
            FilterMode::Exclude,
            false,
        );
        assert_eq!(config.clear_keywords(), 2);
        assert!(config.keywords().is_empty());
        assert_eq!(config.mode, FilterMode::Exclude);
    }

    #[test]
    fn test_media_is_empty() {
        assert!(PostMedia::default().is_empty());
        let media = PostMedia {
            images: vec![ImageRef {
                url: "https://cdn.example/img.jpg".into(),
                alt: String::new(),
            }],
            external: None,
        };
        assert!(!media.is_empty());
    }
}
