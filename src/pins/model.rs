use chrono::{DateTime, Utc};
use serenity::all::{ChannelId, GuildId, MessageId, UserId};

use super::ControlEmoji;

const PERMALINK_BASE: &str = "https://discord.com/channels";

/// Jump link of a guild message. Previews carry it as their embed url, and it
/// is the only thing tying a preview back to its origin.
pub fn permalink(guild_id: GuildId, channel_id: ChannelId, message_id: MessageId) -> String {
    format!("{PERMALINK_BASE}/{guild_id}/{channel_id}/{message_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAuthor {
    pub id: UserId,
    pub name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionSummary {
    pub emoji: String,
    pub count: u64,
    /// Whether the bot itself is among the users who reacted.
    pub me: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbedAuthor {
    pub name: String,
    pub url: Option<String>,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbedFooter {
    pub text: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmbedContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    pub colour: Option<u32>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    pub author: Option<EmbedAuthor>,
    pub fields: Vec<EmbedField>,
    pub footer: Option<EmbedFooter>,
}

/// A guild message that is the subject of a pin or unpin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginMessage {
    pub id: MessageId,
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub channel_name: String,
    pub author: MessageAuthor,
    pub timestamp: DateTime<Utc>,
    /// Body with mentions rendered as readable names.
    pub content: String,
    pub attachments: Vec<Attachment>,
    pub embeds: Vec<EmbedContent>,
    pub reactions: Vec<ReactionSummary>,
}

impl OriginMessage {
    pub fn permalink(&self) -> String {
        permalink(self.guild_id, self.channel_id, self.id)
    }

    pub fn has_own_reaction(&self, emoji: ControlEmoji) -> bool {
        self.reactions
            .iter()
            .any(|reaction| reaction.me && ControlEmoji::from_reaction(&reaction.emoji) == Some(emoji))
    }
}

/// The slice of a pins-channel message the locator looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: MessageId,
    pub first_embed_url: Option<String>,
}
