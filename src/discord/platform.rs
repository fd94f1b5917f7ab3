use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    Cache, ChannelId, Context as SerenityContext, CreateMessage, GetMessages, GuildId, Http,
    Member, MessageId, Permissions, UserId,
};

use super::convert::{create_embed, history_entry, origin_message, reaction_type};
use crate::pins::{
    ControlEmoji, EmbedContent, HistoryEntry, OriginMessage, PinPlatform, PlatformError,
};

const HTTP_NOT_FOUND: u16 = 404;

/// Serenity-backed [`PinPlatform`], built per gateway event from its context.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
    cache: Arc<Cache>,
    current_user_id: UserId,
}

impl SerenityPlatform {
    pub fn from_context(ctx: &SerenityContext) -> Self {
        Self {
            http: ctx.http.clone(),
            cache: ctx.cache.clone(),
            current_user_id: ctx.cache.current_user().id,
        }
    }

    async fn channel_name(&self, channel_id: ChannelId) -> Result<String, PlatformError> {
        let channel = channel_id
            .to_channel((&self.cache, self.http.as_ref()))
            .await
            .map_err(|err| request_error(format!("channel {channel_id}"), err))?;
        channel
            .guild()
            .map(|channel| channel.name)
            .ok_or(PlatformError::InvalidChannel(channel_id))
    }

    fn permissions_from_cache(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        member: &Member,
    ) -> Result<Permissions, PlatformError> {
        let guild = self
            .cache
            .guild(guild_id)
            .ok_or_else(|| PlatformError::NotFound(format!("guild {guild_id}")))?;

        // Threads inherit the permissions of their parent channel.
        let channel = guild
            .channels
            .get(&channel_id)
            .or_else(|| {
                guild
                    .threads
                    .iter()
                    .find(|thread| thread.id == channel_id)
                    .and_then(|thread| thread.parent_id)
                    .and_then(|parent_id| guild.channels.get(&parent_id))
            })
            .ok_or(PlatformError::InvalidChannel(channel_id))?;

        Ok(guild.user_permissions_in(channel, member))
    }
}

fn request_error(what: impl Into<String>, err: serenity::Error) -> PlatformError {
    let what = what.into();
    match &err {
        serenity::Error::Http(http_err)
            if http_err
                .status_code()
                .is_some_and(|status| status.as_u16() == HTTP_NOT_FOUND) =>
        {
            PlatformError::NotFound(what)
        }
        _ => PlatformError::Request(format!("{what}: {err}")),
    }
}

/// A missing target channel means the configured channel is unusable.
fn channel_error(channel_id: ChannelId, err: serenity::Error) -> PlatformError {
    match request_error(format!("channel {channel_id}"), err) {
        PlatformError::NotFound(_) => PlatformError::InvalidChannel(channel_id),
        other => other,
    }
}

#[async_trait]
impl PinPlatform for SerenityPlatform {
    fn current_user_id(&self) -> UserId {
        self.current_user_id
    }

    async fn fetch_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<OriginMessage, PlatformError> {
        let message = channel_id
            .message((&self.cache, self.http.as_ref()), message_id)
            .await
            .map_err(|err| request_error(format!("message {message_id}"), err))?;
        let channel_name = self.channel_name(channel_id).await?;
        let content = message.content_safe(&self.cache);

        Ok(origin_message(&message, guild_id, channel_name, content))
    }

    async fn channel_permissions(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions, PlatformError> {
        let member = guild_id
            .member((&self.cache, self.http.as_ref()), user_id)
            .await
            .map_err(|err| request_error(format!("member {user_id}"), err))?;

        self.permissions_from_cache(guild_id, channel_id, &member)
    }

    async fn send_embeds(
        &self,
        channel_id: ChannelId,
        embeds: &[EmbedContent],
    ) -> Result<MessageId, PlatformError> {
        let builder = CreateMessage::new().embeds(embeds.iter().map(create_embed).collect());
        let message = channel_id
            .send_message(self.http.as_ref(), builder)
            .await
            .map_err(|err| channel_error(channel_id, err))?;
        Ok(message.id)
    }

    async fn message_history(
        &self,
        channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryEntry>, PlatformError> {
        let mut builder = GetMessages::new().limit(limit);
        if let Some(before) = before {
            builder = builder.before(before);
        }
        let messages = channel_id
            .messages(self.http.as_ref(), builder)
            .await
            .map_err(|err| channel_error(channel_id, err))?;
        Ok(messages.iter().map(history_entry).collect())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        self.http
            .delete_message(channel_id, message_id, None)
            .await
            .map_err(|err| request_error(format!("message {message_id}"), err))
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        self.http
            .create_reaction(channel_id, message_id, &reaction_type(emoji))
            .await
            .map_err(|err| request_error(format!("message {message_id}"), err))
    }

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        self.http
            .delete_reaction(channel_id, message_id, user_id, &reaction_type(emoji))
            .await
            .map_err(|err| request_error(format!("{emoji} reaction on message {message_id}"), err))
    }

    async fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        self.http
            .delete_message_reaction_emoji(channel_id, message_id, &reaction_type(emoji))
            .await
            .map_err(|err| request_error(format!("{emoji} reactions on message {message_id}"), err))
    }

    async fn unpin_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        self.http
            .unpin_message(channel_id, message_id, None)
            .await
            .map_err(|err| request_error(format!("pinned message {message_id}"), err))
    }

    async fn send_direct_message(
        &self,
        user_id: UserId,
        content: &str,
    ) -> Result<(), PlatformError> {
        user_id
            .direct_message(self.http.as_ref(), CreateMessage::new().content(content))
            .await
            .map(|_| ())
            .map_err(|err| request_error(format!("direct message channel for user {user_id}"), err))
    }
}
