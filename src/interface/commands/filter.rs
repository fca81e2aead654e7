//! # Filter Commands
//!
//! Handles `.keywords`, `.mode` and `.case`.
//! Keyword lists may be separated by commas, whitespace, or both.

use crate::application::mutator::CommandMutator;
use crate::domain::traits::ChatProvider;
use crate::domain::types::ModeOutcome;
use crate::strings::messages;
use anyhow::Result;

/// Sub-action of `.keywords`.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordAction {
    Show,
    Add(Vec<String>),
    Remove(Vec<String>),
    Clear,
}

pub fn parse_keyword_action(args: &str) -> Option<KeywordAction> {
    let args = args.trim();
    if args.is_empty() {
        return Some(KeywordAction::Show);
    }
    let (verb, rest) = match args.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (args, ""),
    };
    match verb.to_lowercase().as_str() {
        "add" => Some(KeywordAction::Add(split_keywords(rest))).filter(|a| !a.is_empty_list()),
        "remove" | "rm" | "del" => {
            Some(KeywordAction::Remove(split_keywords(rest))).filter(|a| !a.is_empty_list())
        }
        "clear" => Some(KeywordAction::Clear),
        "list" | "show" => Some(KeywordAction::Show),
        _ => None,
    }
}

impl KeywordAction {
    fn is_empty_list(&self) -> bool {
        match self {
            Self::Add(k) | Self::Remove(k) => k.is_empty(),
            _ => false,
        }
    }
}

pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Whether this `.keywords` invocation changes state (and so needs admin rights).
pub fn is_keyword_mutation(args: &str) -> bool {
    !matches!(parse_keyword_action(args), Some(KeywordAction::Show))
}

pub async fn handle_keywords(
    mutator: &CommandMutator,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let reply = match parse_keyword_action(args) {
        Some(KeywordAction::Show) => {
            let status = mutator.status().await;
            messages::keyword_list(&status.keywords, status.mode)
        }
        Some(KeywordAction::Add(keywords)) => {
            let change = mutator.add_keywords(&keywords).await;
            messages::keywords_added(&change.changed, &change.unchanged)
        }
        Some(KeywordAction::Remove(keywords)) => {
            let change = mutator.remove_keywords(&keywords).await;
            messages::keywords_removed(&change.changed, &change.unchanged)
        }
        Some(KeywordAction::Clear) => messages::keywords_cleared(mutator.clear_keywords().await),
        None => messages::KEYWORDS_USAGE.to_string(),
    };
    chat.send_notification(&reply).await.map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_mode(
    mutator: &CommandMutator,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    if args.trim().is_empty() {
        chat.send_notification(messages::MODE_USAGE).await.map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }
    let reply = match mutator.set_mode(args).await {
        ModeOutcome::Set(mode) => messages::mode_set(mode),
        ModeOutcome::InvalidMode(raw) => messages::invalid_mode(&raw),
    };
    chat.send_notification(&reply).await.map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_case(
    mutator: &CommandMutator,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let Some(case_sensitive) = parse_bool(args) else {
        chat.send_notification(messages::CASE_USAGE).await.map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    };
    let applied = mutator.set_case_sensitivity(case_sensitive).await;
    chat.send_notification(&messages::case_set(applied)).await.map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keyword_action() {
        assert_eq!(parse_keyword_action(""), Some(KeywordAction::Show));
        assert_eq!(parse_keyword_action("list"), Some(KeywordAction::Show));
        assert_eq!(
            parse_keyword_action("add ai, Rust  tokio"),
            Some(KeywordAction::Add(vec!["ai".into(), "Rust".into(), "tokio".into()]))
        );
        assert_eq!(
            parse_keyword_action("remove ai"),
            Some(KeywordAction::Remove(vec!["ai".into()]))
        );
        assert_eq!(parse_keyword_action("clear"), Some(KeywordAction::Clear));
        assert_eq!(parse_keyword_action("add"), None);
        assert_eq!(parse_keyword_action("frobnicate x"), None);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("ON"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_is_keyword_mutation() {
        assert!(!is_keyword_mutation(""));
        assert!(!is_keyword_mutation("show"));
        assert!(is_keyword_mutation("add ai"));
        assert!(is_keyword_mutation("clear"));
        // Malformed input only prints usage, but is still gated.
        assert!(is_keyword_mutation("bogus"));
    }
}
