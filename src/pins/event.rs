use serenity::all::{ChannelId, GuildId, MessageId, UserId};

/// A reaction someone added to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAdded {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub user_id: UserId,
    pub emoji: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Regular,
    /// Discord's "X pinned a message to this channel" notice.
    PinNotice,
    /// Notice left in the parent channel when a thread is started.
    ThreadStarter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCreated {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_id: UserId,
    pub kind: MessageKind,
}

/// Audit log record of a moderator using Discord's native pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePinEntry {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub moderator_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinEvent {
    MessageCreated(MessageCreated),
    ReactionAdded(ReactionAdded),
    NativePin(NativePinEntry),
}

impl PinEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MessageCreated(_) => EventKind::MessageCreated,
            Self::ReactionAdded(_) => EventKind::ReactionAdded,
            Self::NativePin(_) => EventKind::NativePin,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MessageCreated,
    ReactionAdded,
    NativePin,
}
