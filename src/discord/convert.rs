//! Translation between serenity models and the pin handlers' own types.

use chrono::{DateTime, Utc};
use serenity::all::{
    ChannelId, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, Embed, GuildId, Message,
    MessageType, Reaction, ReactionType, Timestamp,
};
use serenity::model::guild::audit_log::{Action, AuditLogEntry, MessageAction};

use crate::pins::{
    Attachment, ControlEmoji, EmbedAuthor, EmbedContent, EmbedField, EmbedFooter, HistoryEntry,
    MessageAuthor, MessageCreated, MessageKind, NativePinEntry, OriginMessage, ReactionAdded,
    ReactionSummary,
};

pub(crate) fn reaction_type(emoji: ControlEmoji) -> ReactionType {
    ReactionType::Unicode(emoji.as_str().to_string())
}

pub(crate) fn message_kind(kind: MessageType) -> MessageKind {
    match kind {
        MessageType::PinsAdd => MessageKind::PinNotice,
        MessageType::ThreadCreated => MessageKind::ThreadStarter,
        _ => MessageKind::Regular,
    }
}

pub(crate) fn to_utc(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0)
}

fn to_timestamp(time: &DateTime<Utc>) -> Option<Timestamp> {
    Timestamp::from_unix_timestamp(time.timestamp()).ok()
}

pub(crate) fn embed_content(embed: &Embed) -> EmbedContent {
    EmbedContent {
        title: embed.title.clone(),
        description: embed.description.clone(),
        url: embed.url.clone(),
        timestamp: embed.timestamp.as_ref().and_then(to_utc),
        colour: embed.colour.map(|colour| colour.0),
        image: embed.image.as_ref().map(|image| image.url.clone()),
        thumbnail: embed.thumbnail.as_ref().map(|thumbnail| thumbnail.url.clone()),
        author: embed.author.as_ref().map(|author| EmbedAuthor {
            name: author.name.clone(),
            url: author.url.clone(),
            icon_url: author.icon_url.clone(),
        }),
        fields: embed
            .fields
            .iter()
            .map(|field| EmbedField {
                name: field.name.clone(),
                value: field.value.clone(),
                inline: field.inline,
            })
            .collect(),
        footer: embed.footer.as_ref().map(|footer| EmbedFooter {
            text: footer.text.clone(),
            icon_url: footer.icon_url.clone(),
        }),
    }
}

pub(crate) fn create_embed(embed: &EmbedContent) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(ref title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(ref description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(ref url) = embed.url {
        builder = builder.url(url);
    }
    if let Some(timestamp) = embed.timestamp.as_ref().and_then(to_timestamp) {
        builder = builder.timestamp(timestamp);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    if let Some(ref image) = embed.image {
        builder = builder.image(image);
    }
    if let Some(ref thumbnail) = embed.thumbnail {
        builder = builder.thumbnail(thumbnail);
    }
    if let Some(ref author) = embed.author {
        let mut create_author = CreateEmbedAuthor::new(&author.name);
        if let Some(ref url) = author.url {
            create_author = create_author.url(url);
        }
        if let Some(ref icon_url) = author.icon_url {
            create_author = create_author.icon_url(icon_url);
        }
        builder = builder.author(create_author);
    }
    for field in &embed.fields {
        builder = builder.field(&field.name, &field.value, field.inline);
    }
    if let Some(ref footer) = embed.footer {
        let mut create_footer = CreateEmbedFooter::new(&footer.text);
        if let Some(ref icon_url) = footer.icon_url {
            create_footer = create_footer.icon_url(icon_url);
        }
        builder = builder.footer(create_footer);
    }
    builder
}

/// `content` is the message body with mentions already rendered, and
/// `guild_id` comes from the triggering event since messages fetched over
/// HTTP do not carry one.
pub(crate) fn origin_message(
    message: &Message,
    guild_id: GuildId,
    channel_name: String,
    content: String,
) -> OriginMessage {
    OriginMessage {
        id: message.id,
        guild_id,
        channel_id: message.channel_id,
        channel_name,
        author: MessageAuthor {
            id: message.author.id,
            name: message.author.tag(),
            avatar_url: Some(message.author.face()),
        },
        timestamp: to_utc(&message.timestamp).unwrap_or_else(Utc::now),
        content,
        attachments: message
            .attachments
            .iter()
            .map(|attachment| Attachment {
                filename: attachment.filename.clone(),
                url: attachment.url.clone(),
            })
            .collect(),
        embeds: message.embeds.iter().map(embed_content).collect(),
        reactions: message
            .reactions
            .iter()
            .map(|reaction| ReactionSummary {
                emoji: reaction.reaction_type.to_string(),
                count: reaction.count,
                me: reaction.me,
            })
            .collect(),
    }
}

pub(crate) fn history_entry(message: &Message) -> HistoryEntry {
    HistoryEntry {
        id: message.id,
        first_embed_url: message.embeds.first().and_then(|embed| embed.url.clone()),
    }
}

pub(crate) fn message_created(message: &Message) -> MessageCreated {
    MessageCreated {
        guild_id: message.guild_id,
        channel_id: message.channel_id,
        message_id: message.id,
        author_id: message.author.id,
        kind: message_kind(message.kind),
    }
}

pub(crate) fn reaction_added(reaction: &Reaction) -> Option<ReactionAdded> {
    Some(ReactionAdded {
        guild_id: reaction.guild_id,
        channel_id: reaction.channel_id,
        message_id: reaction.message_id,
        user_id: reaction.user_id?,
        emoji: reaction.emoji.to_string(),
    })
}

pub(crate) fn native_pin_entry(entry: &AuditLogEntry, guild_id: GuildId) -> Option<NativePinEntry> {
    if !matches!(entry.action, Action::Message(MessageAction::Pin)) {
        return None;
    }
    let options = entry.options.as_ref()?;
    let channel_id: ChannelId = options.channel_id?;
    Some(NativePinEntry {
        guild_id,
        channel_id,
        message_id: options.message_id?,
        moderator_id: entry.user_id,
    })
}
