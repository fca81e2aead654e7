//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `.follow`) and dispatches it with the necessary context.
//! Commands that mutate the monitor are restricted to the configured admins.

use anyhow::Result;
use std::sync::Arc;

use crate::application::mutator::CommandMutator;
use crate::domain::config::AppConfig;
use crate::domain::traits::ChatProvider;
use crate::interface::commands;

pub struct CommandRouter {
    config: Arc<AppConfig>,
    mutator: CommandMutator,
}

/// Splits `.cmd args` into the lowercased command and its argument string.
pub fn parse_command(message: &str) -> Option<(String, &str)> {
    let msg = message.trim();
    if !msg.starts_with('.') || msg.len() < 2 {
        return None;
    }
    let (cmd, args) = match msg.find(char::is_whitespace) {
        Some(idx) => (&msg[..idx], msg[idx..].trim()),
        None => (msg, ""),
    };
    Some((cmd.to_lowercase(), args))
}

/// Whether `cmd` (with `args`) changes monitor state.
pub fn requires_admin(cmd: &str, args: &str) -> bool {
    match cmd {
        ".follow" | ".unfollow" | ".mode" | ".case" => true,
        ".keywords" | ".keyword" => commands::filter::is_keyword_mutation(args),
        _ => false,
    }
}

impl CommandRouter {
    pub fn new(config: Arc<AppConfig>, mutator: CommandMutator) -> Self {
        Self { config, mutator }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider + Clone + Send + Sync + 'static,
    {
        let Some((cmd, args)) = parse_command(message) else {
            return Ok(());
        };

        tracing::info!(
            "Router dispatching cmd='{}' args='{}' sender='{}'",
            cmd,
            args,
            sender
        );

        if requires_admin(&cmd, args) && !self.config.is_admin(sender) {
            tracing::warn!("Rejected {} from non-admin {}", cmd, sender);
            chat.send_notification(crate::strings::messages::AUTH_DENIED)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(());
        }

        let mutator = &self.mutator;
        match cmd.as_str() {
            ".follow" => commands::accounts::handle_follow(mutator, chat, args).await?,
            ".unfollow" => commands::accounts::handle_unfollow(mutator, chat, args).await?,
            ".accounts" | ".list" => commands::accounts::handle_accounts(mutator, chat).await?,
            ".keywords" | ".keyword" => {
                commands::filter::handle_keywords(mutator, chat, args).await?
            }
            ".mode" => commands::filter::handle_mode(mutator, chat, args).await?,
            ".case" => commands::filter::handle_case(mutator, chat, args).await?,
            ".status" => commands::misc::handle_status(mutator, chat).await?,
            ".help" => commands::help::handle_help(chat).await?,
            _ => {
                // Ignore unknown dot commands
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::poller::tests::FakeFeed;
    use crate::application::state::{MonitorState, SharedMonitor};
    use crate::domain::types::FilterMode;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct RecordingChat {
        sent: Arc<StdMutex<Vec<String>>>,
    }

    impl RecordingChat {
        fn last(&self) -> String {
            self.sent.lock().unwrap().last().cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl ChatProvider for RecordingChat {
        async fn send_message(&self, content: &str) -> Result<(), String> {
            self.sent.lock().unwrap().push(content.to_string());
            Ok(())
        }

        async fn send_notification(&self, content: &str) -> Result<(), String> {
            self.sent.lock().unwrap().push(content.to_string());
            Ok(())
        }

        fn room_id(&self) -> String {
            "!room:example.org".to_string()
        }
    }

    const CONFIG: &str = r#"
services:
  matrix:
    username: relaybot
    password: secret
    homeserver: https://matrix.example.org
relay:
  room: "!news:example.org"
system:
  admin: ["@admin:example.org"]
"#;

    fn router() -> (CommandRouter, SharedMonitor, RecordingChat) {
        let config = Arc::new(AppConfig::from_yaml(CONFIG).unwrap());
        let feed = FakeFeed::default();
        feed.existing.lock().unwrap().push("alice.example".to_string());
        let state = MonitorState::default().shared();
        let mutator = CommandMutator::new(state.clone(), Arc::new(feed), Duration::from_secs(60));
        (CommandRouter::new(config, mutator), state, RecordingChat::default())
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command(".Follow  alice.example "),
            Some((".follow".to_string(), "alice.example"))
        );
        assert_eq!(parse_command(".status"), Some((".status".to_string(), "")));
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("."), None);
    }

    #[test]
    fn test_requires_admin() {
        assert!(requires_admin(".follow", "x.example"));
        assert!(requires_admin(".keywords", "add ai"));
        assert!(!requires_admin(".keywords", ""));
        assert!(!requires_admin(".status", ""));
        assert!(!requires_admin(".accounts", ""));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_mutate() {
        let (router, state, chat) = router();
        router
            .route(&chat, ".follow alice.example", "@random:example.org")
            .await
            .unwrap();
        assert_eq!(chat.last(), crate::strings::messages::AUTH_DENIED);
        assert!(state.lock().await.accounts().is_empty());
    }

    #[tokio::test]
    async fn test_admin_follow_and_list() {
        let (router, state, chat) = router();
        router
            .route(&chat, ".follow @alice.example", "@Admin:example.org")
            .await
            .unwrap();
        assert!(chat.last().contains("Now following"));
        assert!(state.lock().await.is_registered("alice.example"));

        router.route(&chat, ".accounts", "@random:example.org").await.unwrap();
        assert!(chat.last().contains("@alice.example"));
    }

    #[tokio::test]
    async fn test_admin_filter_commands() {
        let (router, state, chat) = router();
        let admin = "@admin:example.org";
        router.route(&chat, ".keywords add AI, rust", admin).await.unwrap();
        router.route(&chat, ".mode include", admin).await.unwrap();
        router.route(&chat, ".case on", admin).await.unwrap();

        let guard = state.lock().await;
        assert_eq!(guard.filter.keywords(), &["ai".to_string(), "rust".to_string()]);
        assert_eq!(guard.filter.mode, FilterMode::Include);
        assert!(guard.filter.case_sensitive);
    }

    #[tokio::test]
    async fn test_invalid_mode_reports_and_keeps_state() {
        let (router, state, chat) = router();
        router.route(&chat, ".mode sideways", "@admin:example.org").await.unwrap();
        assert!(chat.last().contains("Unknown mode `sideways`"));
        assert_eq!(state.lock().await.filter.mode, FilterMode::None);
    }

    #[tokio::test]
    async fn test_plain_text_ignored() {
        let (router, _state, chat) = router();
        router.route(&chat, "just chatting", "@admin:example.org").await.unwrap();
        router.route(&chat, ".unknown", "@admin:example.org").await.unwrap();
        assert!(chat.sent.lock().unwrap().is_empty());
    }
}
