use std::collections::HashMap;
use std::str::FromStr;

use serenity::all::{ChannelId, GuildId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelMapError {
    #[error("channel map is empty")]
    Empty,
    #[error("malformed channel map entry `{0}`, expected guildId:channelId")]
    MalformedEntry(String),
    #[error("invalid id `{value}` in channel map entry `{entry}`")]
    InvalidId { entry: String, value: String },
    #[error("guild {0} is mapped to more than one pins channel")]
    DuplicateGuild(u64),
}

/// Guild to pins-channel mapping. Built once at startup and shared read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMap {
    pins_channels: HashMap<GuildId, ChannelId>,
}

impl ChannelMap {
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ChannelMapError>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut pins_channels = HashMap::new();
        for (guild, channel) in pairs {
            let entry = format!("{guild}:{channel}");
            let guild_id = non_zero_id(&entry, guild)?;
            let channel_id = non_zero_id(&entry, channel)?;
            if pins_channels
                .insert(GuildId::new(guild_id), ChannelId::new(channel_id))
                .is_some()
            {
                return Err(ChannelMapError::DuplicateGuild(guild_id));
            }
        }

        if pins_channels.is_empty() {
            return Err(ChannelMapError::Empty);
        }

        Ok(Self { pins_channels })
    }

    pub fn pins_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.pins_channels.get(&guild_id).copied()
    }

    pub fn is_tracked(&self, guild_id: GuildId) -> bool {
        self.pins_channels.contains_key(&guild_id)
    }

    pub fn is_pins_channel(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.pins_channel(guild_id) == Some(channel_id)
    }

    pub fn guilds(&self) -> impl Iterator<Item = GuildId> + '_ {
        self.pins_channels.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.pins_channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins_channels.is_empty()
    }
}

impl FromStr for ChannelMap {
    type Err = ChannelMapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut pairs = Vec::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let Some((guild, channel)) = entry.split_once(':') else {
                return Err(ChannelMapError::MalformedEntry(entry.to_string()));
            };
            pairs.push((parse_id(entry, guild)?, parse_id(entry, channel)?));
        }
        Self::from_pairs(pairs)
    }
}

fn parse_id(entry: &str, value: &str) -> Result<u64, ChannelMapError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ChannelMapError::InvalidId {
            entry: entry.to_string(),
            value: value.trim().to_string(),
        })
}

// serenity ids are non-zero; reject zero here instead of panicking in `new`.
fn non_zero_id(entry: &str, value: u64) -> Result<u64, ChannelMapError> {
    if value == 0 {
        return Err(ChannelMapError::InvalidId {
            entry: entry.to_string(),
            value: "0".to_string(),
        });
    }
    Ok(value)
}
