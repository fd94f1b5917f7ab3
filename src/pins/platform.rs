use async_trait::async_trait;
use serenity::all::{ChannelId, GuildId, MessageId, Permissions, UserId};
use thiserror::Error;

use super::model::{EmbedContent, HistoryEntry, OriginMessage};
use super::ControlEmoji;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("channel {0} is not a usable guild text channel")]
    InvalidChannel(ChannelId),
    #[error("discord request failed: {0}")]
    Request(String),
}

impl PlatformError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Turns "already gone" into `Ok(None)` and leaves every other failure alone.
pub fn ignore_not_found<T>(result: Result<T, PlatformError>) -> Result<Option<T>, PlatformError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Every outbound call the pin handlers make.
#[async_trait]
pub trait PinPlatform: Send + Sync {
    fn current_user_id(&self) -> UserId;

    async fn fetch_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<OriginMessage, PlatformError>;

    /// Permissions of `user_id` in `channel_id`, with overwrites applied.
    async fn channel_permissions(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions, PlatformError>;

    async fn send_embeds(
        &self,
        channel_id: ChannelId,
        embeds: &[EmbedContent],
    ) -> Result<MessageId, PlatformError>;

    /// Up to `limit` messages older than `before` (or the newest ones), newest
    /// first.
    async fn message_history(
        &self,
        channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryEntry>, PlatformError>;

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError>;

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError>;

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError>;

    /// Removes every user's reaction of `emoji` from the message.
    async fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError>;

    async fn unpin_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError>;

    async fn send_direct_message(&self, user_id: UserId, content: &str)
    -> Result<(), PlatformError>;
}
