//! # Miscellaneous Commands
//!
//! Handles `.status`.

use crate::application::mutator::CommandMutator;
use crate::domain::traits::ChatProvider;
use anyhow::Result;

pub async fn handle_status(mutator: &CommandMutator, chat: &impl ChatProvider) -> Result<()> {
    let report = mutator.status().await;
    chat.send_message(&crate::strings::messages::status(&report))
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
