//! In-memory `PinPlatform` for handler tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serenity::all::{ChannelId, GuildId, MessageId, Permissions, UserId};

use super::model::{
    Attachment, EmbedContent, HistoryEntry, MessageAuthor, OriginMessage, ReactionSummary,
};
use super::platform::{PinPlatform, PlatformError};
use super::ControlEmoji;

const FIRST_MESSAGE_ID: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub id: MessageId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub author_id: UserId,
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<EmbedContent>,
    /// Reaction string and the users who reacted with it, in insertion order.
    pub reactions: Vec<(String, Vec<UserId>)>,
}

#[derive(Default)]
struct FakeState {
    next_id: u64,
    /// Oldest first, per channel.
    channels: HashMap<ChannelId, Vec<StoredMessage>>,
    permissions: HashMap<UserId, Permissions>,
    native_pins: HashSet<MessageId>,
    direct_messages: Vec<(UserId, String)>,
    broken_channels: HashSet<ChannelId>,
    rejected_deletes: HashSet<ChannelId>,
    history_requests: usize,
    history_scanned: usize,
    deletes: Vec<MessageId>,
}

pub struct FakePlatform {
    bot_id: UserId,
    guild_id: GuildId,
    state: Mutex<FakeState>,
}

impl FakePlatform {
    pub fn new(bot_id: UserId) -> Self {
        Self::with_guild(bot_id, GuildId::new(10))
    }

    pub fn with_guild(bot_id: UserId, guild_id: GuildId) -> Self {
        Self {
            bot_id,
            guild_id,
            state: Mutex::new(FakeState {
                next_id: FIRST_MESSAGE_ID,
                ..FakeState::default()
            }),
        }
    }

    pub fn grant(&self, user_id: UserId, permissions: Permissions) {
        self.state.lock().permissions.insert(user_id, permissions);
    }

    /// Makes every call touching `channel_id` fail as if it were not a text
    /// channel.
    pub fn break_channel(&self, channel_id: ChannelId) {
        self.state.lock().broken_channels.insert(channel_id);
    }

    /// Makes deletes in `channel_id` fail with a request error while reads
    /// keep working.
    pub fn reject_deletes(&self, channel_id: ChannelId) {
        self.state.lock().rejected_deletes.insert(channel_id);
    }

    pub fn post(&self, channel_id: ChannelId, author_id: UserId, content: &str) -> MessageId {
        self.insert(channel_id, author_id, content, Vec::new(), Vec::new())
    }

    pub fn post_with_attachments(
        &self,
        channel_id: ChannelId,
        author_id: UserId,
        content: &str,
        filenames: &[&str],
    ) -> MessageId {
        let attachments = filenames
            .iter()
            .map(|name| Attachment {
                filename: name.to_string(),
                url: format!("https://cdn.example/{name}"),
            })
            .collect();
        self.insert(channel_id, author_id, content, attachments, Vec::new())
    }

    pub fn post_with_embeds(
        &self,
        channel_id: ChannelId,
        author_id: UserId,
        content: &str,
        embeds: Vec<EmbedContent>,
    ) -> MessageId {
        self.insert(channel_id, author_id, content, Vec::new(), embeds)
    }

    pub fn add_preview(&self, channel_id: ChannelId, link: &str) -> MessageId {
        self.add_message_with_embed_urls(channel_id, &[link])
    }

    pub fn add_message_with_embed_urls(&self, channel_id: ChannelId, urls: &[&str]) -> MessageId {
        let embeds = urls
            .iter()
            .map(|url| EmbedContent {
                url: Some(url.to_string()),
                ..EmbedContent::default()
            })
            .collect();
        self.insert(channel_id, self.bot_id, "", Vec::new(), embeds)
    }

    pub fn fill_channel(&self, channel_id: ChannelId, count: usize) {
        for index in 0..count {
            self.insert(channel_id, self.bot_id, &format!("filler {index}"), Vec::new(), Vec::new());
        }
    }

    pub fn react(&self, channel_id: ChannelId, message_id: MessageId, user_id: UserId, emoji: &str) {
        let mut state = self.state.lock();
        if let Some(message) = find_mut(&mut state, channel_id, message_id) {
            add_user_reaction(message, emoji, user_id);
        }
    }

    pub fn pin_natively(&self, message_id: MessageId) {
        self.state.lock().native_pins.insert(message_id);
    }

    pub fn is_natively_pinned(&self, message_id: MessageId) -> bool {
        self.state.lock().native_pins.contains(&message_id)
    }

    pub fn messages_in(&self, channel_id: ChannelId) -> Vec<StoredMessage> {
        self.state
            .lock()
            .channels
            .get(&channel_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn message(&self, channel_id: ChannelId, message_id: MessageId) -> Option<StoredMessage> {
        self.messages_in(channel_id)
            .into_iter()
            .find(|message| message.id == message_id)
    }

    /// Users who reacted with `emoji` on the message.
    pub fn reactors(&self, channel_id: ChannelId, message_id: MessageId, emoji: ControlEmoji) -> Vec<UserId> {
        self.message(channel_id, message_id)
            .and_then(|message| {
                message
                    .reactions
                    .into_iter()
                    .find(|(key, _)| ControlEmoji::from_reaction(key) == Some(emoji))
                    .map(|(_, users)| users)
            })
            .unwrap_or_default()
    }

    pub fn direct_messages(&self) -> Vec<(UserId, String)> {
        self.state.lock().direct_messages.clone()
    }

    pub fn deletes(&self) -> Vec<MessageId> {
        self.state.lock().deletes.clone()
    }

    pub fn history_requests(&self) -> usize {
        self.state.lock().history_requests
    }

    pub fn history_scanned(&self) -> usize {
        self.state.lock().history_scanned
    }

    fn insert(
        &self,
        channel_id: ChannelId,
        author_id: UserId,
        content: &str,
        attachments: Vec<Attachment>,
        embeds: Vec<EmbedContent>,
    ) -> MessageId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = MessageId::new(state.next_id);
        state
            .channels
            .entry(channel_id)
            .or_default()
            .push(StoredMessage {
                id,
                guild_id: self.guild_id,
                channel_id,
                author_id,
                content: content.to_string(),
                attachments,
                embeds,
                reactions: Vec::new(),
            });
        id
    }

    fn check_channel(&self, state: &FakeState, channel_id: ChannelId) -> Result<(), PlatformError> {
        if state.broken_channels.contains(&channel_id) {
            return Err(PlatformError::InvalidChannel(channel_id));
        }
        Ok(())
    }
}

fn find_mut(
    state: &mut FakeState,
    channel_id: ChannelId,
    message_id: MessageId,
) -> Option<&mut StoredMessage> {
    state
        .channels
        .get_mut(&channel_id)
        .and_then(|messages| messages.iter_mut().find(|message| message.id == message_id))
}

fn add_user_reaction(message: &mut StoredMessage, emoji: &str, user_id: UserId) {
    match message.reactions.iter_mut().find(|(key, _)| key == emoji) {
        Some((_, users)) => {
            if !users.contains(&user_id) {
                users.push(user_id);
            }
        }
        None => message.reactions.push((emoji.to_string(), vec![user_id])),
    }
}

fn not_found(message_id: MessageId) -> PlatformError {
    PlatformError::NotFound(format!("message {message_id}"))
}

#[async_trait]
impl PinPlatform for FakePlatform {
    fn current_user_id(&self) -> UserId {
        self.bot_id
    }

    async fn fetch_message(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<OriginMessage, PlatformError> {
        let state = self.state.lock();
        self.check_channel(&state, channel_id)?;
        let stored = state
            .channels
            .get(&channel_id)
            .and_then(|messages| messages.iter().find(|message| message.id == message_id))
            .ok_or_else(|| not_found(message_id))?;

        Ok(OriginMessage {
            id: stored.id,
            guild_id,
            channel_id,
            channel_name: format!("channel-{channel_id}"),
            author: MessageAuthor {
                id: stored.author_id,
                name: format!("user-{}", stored.author_id),
                avatar_url: None,
            },
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            content: stored.content.clone(),
            attachments: stored.attachments.clone(),
            embeds: stored.embeds.clone(),
            reactions: stored
                .reactions
                .iter()
                .map(|(emoji, users)| ReactionSummary {
                    emoji: emoji.clone(),
                    count: users.len() as u64,
                    me: users.contains(&self.bot_id),
                })
                .collect(),
        })
    }

    async fn channel_permissions(
        &self,
        _guild_id: GuildId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Permissions, PlatformError> {
        let state = self.state.lock();
        self.check_channel(&state, channel_id)?;
        Ok(state
            .permissions
            .get(&user_id)
            .copied()
            .unwrap_or_else(Permissions::empty))
    }

    async fn send_embeds(
        &self,
        channel_id: ChannelId,
        embeds: &[EmbedContent],
    ) -> Result<MessageId, PlatformError> {
        self.check_channel(&self.state.lock(), channel_id)?;
        Ok(self.insert(channel_id, self.bot_id, "", Vec::new(), embeds.to_vec()))
    }

    async fn message_history(
        &self,
        channel_id: ChannelId,
        before: Option<MessageId>,
        limit: u8,
    ) -> Result<Vec<HistoryEntry>, PlatformError> {
        let mut state = self.state.lock();
        self.check_channel(&state, channel_id)?;
        let page: Vec<HistoryEntry> = state
            .channels
            .get(&channel_id)
            .map(|messages| {
                messages
                    .iter()
                    .rev()
                    .filter(|message| before.is_none_or(|before| message.id < before))
                    .take(limit as usize)
                    .map(|message| HistoryEntry {
                        id: message.id,
                        first_embed_url: message.embeds.first().and_then(|embed| embed.url.clone()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        state.history_requests += 1;
        state.history_scanned += page.len();
        Ok(page)
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        self.check_channel(&state, channel_id)?;
        if state.rejected_deletes.contains(&channel_id) {
            return Err(PlatformError::Request(format!(
                "delete message {message_id}: 500 Internal Server Error"
            )));
        }
        let messages = state.channels.entry(channel_id).or_default();
        let before = messages.len();
        messages.retain(|message| message.id != message_id);
        if messages.len() == before {
            return Err(not_found(message_id));
        }
        state.deletes.push(message_id);
        Ok(())
    }

    async fn add_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        let bot_id = self.bot_id;
        let mut state = self.state.lock();
        let message = find_mut(&mut state, channel_id, message_id).ok_or_else(|| not_found(message_id))?;
        add_user_reaction(message, emoji.as_str(), bot_id);
        Ok(())
    }

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        user_id: UserId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let message = find_mut(&mut state, channel_id, message_id).ok_or_else(|| not_found(message_id))?;
        for (key, users) in message.reactions.iter_mut() {
            if ControlEmoji::from_reaction(key) == Some(emoji) {
                users.retain(|user| *user != user_id);
            }
        }
        message.reactions.retain(|(_, users)| !users.is_empty());
        Ok(())
    }

    async fn clear_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: ControlEmoji,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock();
        let message = find_mut(&mut state, channel_id, message_id).ok_or_else(|| not_found(message_id))?;
        message
            .reactions
            .retain(|(key, _)| ControlEmoji::from_reaction(key) != Some(emoji));
        Ok(())
    }

    async fn unpin_message(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        if self.state.lock().native_pins.remove(&message_id) {
            Ok(())
        } else {
            Err(not_found(message_id))
        }
    }

    async fn send_direct_message(&self, user_id: UserId, content: &str) -> Result<(), PlatformError> {
        self.state
            .lock()
            .direct_messages
            .push((user_id, content.to_string()));
        Ok(())
    }
}
