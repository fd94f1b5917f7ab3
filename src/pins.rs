use crate::config::{ChannelMap, PinsConfig};

pub mod dispatch;
pub mod emoji;
pub mod event;
pub mod guard;
pub mod locator;
pub mod model;
pub mod permission;
pub mod platform;
pub mod preview;
pub mod protocol;

#[cfg(test)]
pub mod testing;

pub use self::dispatch::{default_dispatcher, EventDispatcher, HandlerResult};
pub use self::emoji::ControlEmoji;
pub use self::event::{MessageCreated, MessageKind, NativePinEntry, PinEvent, ReactionAdded};
pub use self::model::{
    Attachment, EmbedAuthor, EmbedContent, EmbedField, EmbedFooter, HistoryEntry, MessageAuthor,
    OriginMessage, ReactionSummary,
};
pub use self::platform::{PinPlatform, PlatformError};

/// Read-only settings every handler sees. Built once at startup.
#[derive(Debug, Clone)]
pub struct PinContext {
    pub channel_map: ChannelMap,
    pub history_limit: usize,
}

impl PinContext {
    pub fn from_config(config: &PinsConfig) -> Self {
        Self {
            channel_map: config.channel_map.clone(),
            history_limit: config.history_limit,
        }
    }
}
