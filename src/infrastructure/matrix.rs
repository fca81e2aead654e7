//! # Matrix Service Adapter
//!
//! Implements the `ChatProvider` and `RelayTarget` traits for the Matrix protocol using the `matrix_sdk`.
//! Command replies go to the room the command came from; relayed posts go to the configured
//! destination room.

use crate::application::post_formatter::PostFormatter;
use crate::domain::traits::{ChatProvider, RelayTarget};
use crate::domain::types::Post;
use anyhow::{Context, Result};
use async_trait::async_trait;
use matrix_sdk::Client;
use matrix_sdk::room::Room;
use matrix_sdk::ruma::RoomOrAliasId;
use matrix_sdk::ruma::events::room::message::RoomMessageEventContent;

#[derive(Clone)]
pub struct MatrixService {
    room: Room,
}

impl MatrixService {
    pub fn new(room: Room) -> Self {
        Self { room }
    }

    /// Joins (or re-joins) the room named by an ID or alias and wraps it.
    pub async fn join(client: &Client, room: &str) -> Result<Self> {
        let id = <&RoomOrAliasId>::try_from(room)
            .with_context(|| format!("Invalid room ID or alias: {room}"))?;
        let room = client
            .join_room_by_id_or_alias(id, &[])
            .await
            .with_context(|| format!("Failed to join relay room {room}"))?;
        Ok(Self::new(room))
    }
}

#[async_trait]
impl ChatProvider for MatrixService {
    fn room_id(&self) -> String {
        self.room.room_id().as_str().to_string()
    }

    async fn send_message(&self, content: &str) -> Result<(), String> {
        tracing::debug!("Bot sending message to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::text_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        tracing::debug!("Bot sending notice to {}: {}", self.room_id(), content);
        self.room
            .send(RoomMessageEventContent::notice_markdown(content))
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl RelayTarget for MatrixService {
    async fn relay(&self, post: &Post) -> Result<(), String> {
        self.send_message(&PostFormatter::format(post)).await
    }
}
