//! # Account Commands
//!
//! Handles `.follow`, `.unfollow` and `.accounts`.

use crate::application::mutator::CommandMutator;
use crate::domain::traits::ChatProvider;
use crate::domain::types::{FollowOutcome, UnfollowOutcome};
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_follow(
    mutator: &CommandMutator,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let handle = args.trim();
    if handle.is_empty() {
        chat.send_notification(messages::FOLLOW_USAGE).await.map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let reply = match mutator.follow(handle).await {
        FollowOutcome::Followed(h) => messages::followed(&h),
        FollowOutcome::AlreadyFollowed(h) => messages::already_followed(&h),
        FollowOutcome::InvalidHandle(h) => messages::invalid_handle(&h),
        FollowOutcome::NotFound(h) => messages::account_not_found(&h),
        FollowOutcome::LookupFailed { handle, error } => messages::lookup_failed(&handle, &error),
    };
    chat.send_notification(&reply).await.map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_unfollow(
    mutator: &CommandMutator,
    chat: &impl ChatProvider,
    args: &str,
) -> Result<()> {
    let handle = args.trim();
    if handle.is_empty() {
        chat.send_notification(messages::UNFOLLOW_USAGE).await.map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let reply = match mutator.unfollow(handle).await {
        UnfollowOutcome::Unfollowed(h) => messages::unfollowed(&h),
        UnfollowOutcome::NotFollowed(h) => messages::not_followed(&h),
    };
    chat.send_notification(&reply).await.map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_accounts(mutator: &CommandMutator, chat: &impl ChatProvider) -> Result<()> {
    let accounts = mutator.list_accounts().await;
    let reply = if accounts.is_empty() {
        messages::NO_ACCOUNTS.to_string()
    } else {
        messages::account_list(&accounts)
    };
    chat.send_message(&reply).await.map_err(|e| anyhow::anyhow!(e))
}
