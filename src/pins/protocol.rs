use std::sync::Arc;

use anyhow::Result;
use serenity::all::{ChannelId, GuildId, MessageId, UserId};
use tracing::{debug, info, warn};

use super::event::{NativePinEntry, ReactionAdded};
use super::locator::locate_preview;
use super::model::{permalink, OriginMessage};
use super::permission::may_manage_pins;
use super::platform::{ignore_not_found, PinPlatform};
use super::preview::preview_message_embeds;
use super::{ControlEmoji, PinContext};

pub const ALREADY_PINNED_NOTICE: &str = "This message has already been pinned! 🫠";
pub const PERMISSION_DENIED_NOTICE: &str =
    "You need the Manage Messages permission in that channel to pin or unpin messages. 🫠";

fn pin_not_found_notice(history_limit: usize) -> String {
    format!(
        "I couldn't find a pin for that message in the last {history_limit} messages of the pins channel, so there was nothing to remove. 🫠"
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotControlEmoji,
    DirectMessage,
    UntrackedGuild,
    PinsChannel,
    OwnReaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Pinned { preview_id: MessageId },
    AlreadyPinned,
    Unpinned { preview_id: MessageId },
    PreviewNotRemoved { preview_id: MessageId },
    PinNotFound,
    PermissionDenied,
    Ignored(IgnoreReason),
}

/// Drives the Unpinned/Pinned cycle of origin messages. A message counts as
/// pinned while the bot's own 📌 reaction sits on it; previews are found
/// again by searching the pins channel for the origin's permalink.
#[derive(Clone)]
pub struct PinControl {
    ctx: Arc<PinContext>,
}

impl PinControl {
    pub fn new(ctx: Arc<PinContext>) -> Self {
        Self { ctx }
    }

    pub async fn handle_reaction(
        &self,
        platform: &dyn PinPlatform,
        event: &ReactionAdded,
    ) -> Result<PinOutcome> {
        let Some(emoji) = ControlEmoji::from_reaction(&event.emoji) else {
            return Ok(PinOutcome::Ignored(IgnoreReason::NotControlEmoji));
        };
        let Some(guild_id) = event.guild_id else {
            return Ok(PinOutcome::Ignored(IgnoreReason::DirectMessage));
        };
        let Some(pins_channel) = self.ctx.channel_map.pins_channel(guild_id) else {
            return Ok(PinOutcome::Ignored(IgnoreReason::UntrackedGuild));
        };
        if self.ctx.channel_map.is_pins_channel(guild_id, event.channel_id) {
            return Ok(PinOutcome::Ignored(IgnoreReason::PinsChannel));
        }
        if event.user_id == platform.current_user_id() {
            return Ok(PinOutcome::Ignored(IgnoreReason::OwnReaction));
        }

        let permissions = platform
            .channel_permissions(guild_id, event.channel_id, event.user_id)
            .await?;
        if !may_manage_pins(permissions) {
            info!(
                "rejecting {} from user_id={} without pin rights message_id={}",
                emoji, event.user_id, event.message_id
            );
            self.reject(platform, event, emoji, PERMISSION_DENIED_NOTICE).await;
            return Ok(PinOutcome::PermissionDenied);
        }

        match emoji {
            ControlEmoji::Pin => self.pin(platform, guild_id, pins_channel, event).await,
            ControlEmoji::Remove => self.unpin(platform, guild_id, pins_channel, event).await,
        }
    }

    /// A moderator used Discord's own pin. Mirror the message like a 📌
    /// reaction would, then undo the native pin so the pins channel stays the
    /// single place pins live.
    pub async fn handle_native_pin(
        &self,
        platform: &dyn PinPlatform,
        entry: &NativePinEntry,
    ) -> Result<PinOutcome> {
        let Some(pins_channel) = self.ctx.channel_map.pins_channel(entry.guild_id) else {
            return Ok(PinOutcome::Ignored(IgnoreReason::UntrackedGuild));
        };
        if self.ctx.channel_map.is_pins_channel(entry.guild_id, entry.channel_id) {
            return Ok(PinOutcome::Ignored(IgnoreReason::PinsChannel));
        }

        let origin = platform
            .fetch_message(entry.guild_id, entry.channel_id, entry.message_id)
            .await?;

        let outcome = if origin.has_own_reaction(ControlEmoji::Pin) {
            debug!(
                "native pin of already mirrored message_id={} by moderator_id={}",
                entry.message_id, entry.moderator_id
            );
            PinOutcome::AlreadyPinned
        } else {
            let preview_id = self.post_preview(platform, pins_channel, &origin).await?;
            PinOutcome::Pinned { preview_id }
        };

        if let Err(err) = ignore_not_found(
            platform
                .unpin_message(entry.channel_id, entry.message_id)
                .await,
        ) {
            warn!(
                "failed to undo native pin message_id={}: {}",
                entry.message_id, err
            );
        }

        if let PinOutcome::Pinned { .. } = outcome {
            self.attach_controls(platform, &origin).await;
        }

        Ok(outcome)
    }

    async fn pin(
        &self,
        platform: &dyn PinPlatform,
        guild_id: GuildId,
        pins_channel: ChannelId,
        event: &ReactionAdded,
    ) -> Result<PinOutcome> {
        let origin = platform
            .fetch_message(guild_id, event.channel_id, event.message_id)
            .await?;

        if origin.has_own_reaction(ControlEmoji::Pin) {
            debug!(
                "duplicate pin request message_id={} user_id={}",
                event.message_id, event.user_id
            );
            self.reject(platform, event, ControlEmoji::Pin, ALREADY_PINNED_NOTICE)
                .await;
            return Ok(PinOutcome::AlreadyPinned);
        }

        let preview_id = self.post_preview(platform, pins_channel, &origin).await?;
        self.attach_controls(platform, &origin).await;

        Ok(PinOutcome::Pinned { preview_id })
    }

    async fn unpin(
        &self,
        platform: &dyn PinPlatform,
        guild_id: GuildId,
        pins_channel: ChannelId,
        event: &ReactionAdded,
    ) -> Result<PinOutcome> {
        let link = permalink(guild_id, event.channel_id, event.message_id);
        let located =
            locate_preview(platform, pins_channel, &link, self.ctx.history_limit).await?;

        let outcome = match located {
            Some(preview_id) => {
                match ignore_not_found(platform.delete_message(pins_channel, preview_id).await) {
                    Ok(_) => {
                        info!(
                            "removed pin message_id={} preview_id={} user_id={}",
                            event.message_id, preview_id, event.user_id
                        );
                        PinOutcome::Unpinned { preview_id }
                    }
                    Err(err) => {
                        warn!(
                            "failed to delete preview_id={} for message_id={}, preview left in place: {}",
                            preview_id, event.message_id, err
                        );
                        PinOutcome::PreviewNotRemoved { preview_id }
                    }
                }
            }
            None => {
                info!(
                    "no preview within {} messages for message_id={}",
                    self.ctx.history_limit, event.message_id
                );
                self.notify(
                    platform,
                    event.user_id,
                    &pin_not_found_notice(self.ctx.history_limit),
                )
                .await;
                PinOutcome::PinNotFound
            }
        };

        // Runs whatever the search found, so the message never gets stuck
        // looking pinned.
        self.clear_controls(platform, event.channel_id, event.message_id)
            .await;

        Ok(outcome)
    }

    async fn post_preview(
        &self,
        platform: &dyn PinPlatform,
        pins_channel: ChannelId,
        origin: &OriginMessage,
    ) -> Result<MessageId> {
        let embeds = preview_message_embeds(origin);
        let preview_id = platform.send_embeds(pins_channel, &embeds).await?;
        info!(
            "created pin message_id={} guild_id={} preview_id={}",
            origin.id, origin.guild_id, preview_id
        );
        Ok(preview_id)
    }

    async fn attach_controls(&self, platform: &dyn PinPlatform, origin: &OriginMessage) {
        for emoji in ControlEmoji::ALL {
            if let Err(err) = platform
                .add_reaction(origin.channel_id, origin.id, emoji)
                .await
            {
                warn!(
                    "failed to add {} to message_id={}: {}",
                    emoji, origin.id, err
                );
            }
        }
    }

    async fn clear_controls(
        &self,
        platform: &dyn PinPlatform,
        channel_id: ChannelId,
        message_id: MessageId,
    ) {
        for emoji in ControlEmoji::ALL {
            if let Err(err) =
                ignore_not_found(platform.clear_reaction(channel_id, message_id, emoji).await)
            {
                warn!(
                    "failed to clear {} from message_id={}: {}",
                    emoji, message_id, err
                );
            }
        }
    }

    async fn reject(
        &self,
        platform: &dyn PinPlatform,
        event: &ReactionAdded,
        emoji: ControlEmoji,
        notice: &str,
    ) {
        if let Err(err) = ignore_not_found(
            platform
                .remove_reaction(event.channel_id, event.message_id, event.user_id, emoji)
                .await,
        ) {
            warn!(
                "failed to strip {} from message_id={}: {}",
                emoji, event.message_id, err
            );
        }
        self.notify(platform, event.user_id, notice).await;
    }

    async fn notify(&self, platform: &dyn PinPlatform, user_id: UserId, notice: &str) {
        if let Err(err) = platform.send_direct_message(user_id, notice).await {
            warn!("failed to send direct message to user_id={}: {}", user_id, err);
        }
    }
}
