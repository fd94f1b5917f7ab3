use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use super::event::{MessageCreated, MessageKind};
use super::platform::{ignore_not_found, PinPlatform};
use super::PinContext;

pub const USE_A_THREAD_NOTICE: &str =
    "Please don't send messages in the pins channel! Try starting a thread instead. 🫠";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allowed,
    RemovedPinNotice,
    RemovedStrayMessage,
    Ignored,
}

/// Keeps the pins channel read-only for people and sweeps away Discord's own
/// pin notices in tracked guilds.
#[derive(Clone)]
pub struct ChannelGuard {
    ctx: Arc<PinContext>,
}

impl ChannelGuard {
    pub fn new(ctx: Arc<PinContext>) -> Self {
        Self { ctx }
    }

    pub async fn handle_message(
        &self,
        platform: &dyn PinPlatform,
        event: &MessageCreated,
    ) -> Result<GuardOutcome> {
        let Some(guild_id) = event.guild_id else {
            return Ok(GuardOutcome::Ignored);
        };
        if !self.ctx.channel_map.is_tracked(guild_id) {
            return Ok(GuardOutcome::Ignored);
        }

        if event.kind == MessageKind::PinNotice {
            debug!(
                "removing native pin notice channel_id={} message_id={}",
                event.channel_id, event.message_id
            );
            ignore_not_found(
                platform
                    .delete_message(event.channel_id, event.message_id)
                    .await,
            )?;
            return Ok(GuardOutcome::RemovedPinNotice);
        }

        if !self.ctx.channel_map.is_pins_channel(guild_id, event.channel_id)
            || event.author_id == platform.current_user_id()
            || event.kind == MessageKind::ThreadStarter
        {
            return Ok(GuardOutcome::Allowed);
        }

        info!(
            "removing message from user_id={} in pins channel_id={}",
            event.author_id, event.channel_id
        );
        ignore_not_found(
            platform
                .delete_message(event.channel_id, event.message_id)
                .await,
        )?;
        if let Err(err) = platform
            .send_direct_message(event.author_id, USE_A_THREAD_NOTICE)
            .await
        {
            warn!(
                "failed to send direct message to user_id={}: {}",
                event.author_id, err
            );
        }

        Ok(GuardOutcome::RemovedStrayMessage)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serenity::all::{ChannelId, GuildId, MessageId, UserId};

    use super::{ChannelGuard, GuardOutcome, USE_A_THREAD_NOTICE};
    use crate::config::ChannelMap;
    use crate::pins::event::{MessageCreated, MessageKind};
    use crate::pins::testing::FakePlatform;
    use crate::pins::PinContext;

    fn guard() -> ChannelGuard {
        ChannelGuard::new(Arc::new(PinContext {
            channel_map: ChannelMap::from_pairs([(10, 500)]).expect("channel map"),
            history_limit: 1000,
        }))
    }

    fn bot() -> UserId {
        UserId::new(1)
    }

    fn created(
        channel_id: ChannelId,
        message_id: MessageId,
        author_id: UserId,
        kind: MessageKind,
    ) -> MessageCreated {
        MessageCreated {
            guild_id: Some(GuildId::new(10)),
            channel_id,
            message_id,
            author_id,
            kind,
        }
    }

    #[tokio::test]
    async fn human_message_in_pins_channel_is_removed() {
        let platform = FakePlatform::new(bot());
        let pins = ChannelId::new(500);
        let author = UserId::new(7);
        let message_id = platform.post(pins, author, "nice pin!");

        let outcome = guard()
            .handle_message(&platform, &created(pins, message_id, author, MessageKind::Regular))
            .await
            .expect("handled");

        assert_eq!(outcome, GuardOutcome::RemovedStrayMessage);
        assert!(platform.message(pins, message_id).is_none());
        assert_eq!(
            platform.direct_messages(),
            vec![(author, USE_A_THREAD_NOTICE.to_string())]
        );
    }

    #[tokio::test]
    async fn bot_previews_stay() {
        let platform = FakePlatform::new(bot());
        let pins = ChannelId::new(500);
        let preview_id = platform.add_preview(pins, "https://discord.com/channels/10/20/30");

        let outcome = guard()
            .handle_message(&platform, &created(pins, preview_id, bot(), MessageKind::Regular))
            .await
            .expect("handled");

        assert_eq!(outcome, GuardOutcome::Allowed);
        assert!(platform.message(pins, preview_id).is_some());
    }

    #[tokio::test]
    async fn thread_messages_and_thread_notices_stay() {
        let platform = FakePlatform::new(bot());
        let pins = ChannelId::new(500);
        let thread = ChannelId::new(501);
        let author = UserId::new(7);
        let in_thread = platform.post(thread, author, "discussion");
        let starter = platform.post(pins, author, "");

        let thread_outcome = guard()
            .handle_message(&platform, &created(thread, in_thread, author, MessageKind::Regular))
            .await
            .expect("handled");
        let starter_outcome = guard()
            .handle_message(&platform, &created(pins, starter, author, MessageKind::ThreadStarter))
            .await
            .expect("handled");

        assert_eq!(thread_outcome, GuardOutcome::Allowed);
        assert_eq!(starter_outcome, GuardOutcome::Allowed);
        assert!(platform.direct_messages().is_empty());
    }

    #[tokio::test]
    async fn pin_notices_are_removed_anywhere_in_tracked_guilds() {
        let platform = FakePlatform::new(bot());
        let general = ChannelId::new(20);
        let author = UserId::new(7);
        let notice = platform.post(general, author, "");

        let outcome = guard()
            .handle_message(&platform, &created(general, notice, author, MessageKind::PinNotice))
            .await
            .expect("handled");

        assert_eq!(outcome, GuardOutcome::RemovedPinNotice);
        assert!(platform.message(general, notice).is_none());
        assert!(platform.direct_messages().is_empty());
    }

    #[tokio::test]
    async fn already_deleted_message_is_not_an_error() {
        let platform = FakePlatform::new(bot());
        let general = ChannelId::new(20);

        let outcome = guard()
            .handle_message(
                &platform,
                &created(general, MessageId::new(42), UserId::new(7), MessageKind::PinNotice),
            )
            .await
            .expect("handled");

        assert_eq!(outcome, GuardOutcome::RemovedPinNotice);
    }

    #[tokio::test]
    async fn untracked_guilds_and_direct_messages_are_ignored() {
        let platform = FakePlatform::new(bot());
        let mut elsewhere =
            created(ChannelId::new(500), MessageId::new(42), UserId::new(7), MessageKind::PinNotice);
        elsewhere.guild_id = Some(GuildId::new(99));
        let mut direct = elsewhere.clone();
        direct.guild_id = None;

        let untracked = guard().handle_message(&platform, &elsewhere).await.expect("handled");
        let dm = guard().handle_message(&platform, &direct).await.expect("handled");

        assert_eq!(untracked, GuardOutcome::Ignored);
        assert_eq!(dm, GuardOutcome::Ignored);
        assert!(platform.deletes().is_empty());
    }
}
