use std::sync::Arc;

use anyhow::{anyhow, Result};
use secrecy::ExposeSecret;
use serenity::all::{
    Cache, ChannelId, ChannelType, Client as SerenityClient, Context as SerenityContext,
    EventHandler as SerenityEventHandler, GatewayIntents, GuildId, Message as SerenityMessage,
    Reaction, Ready, ShardManager,
};
use serenity::model::guild::audit_log::AuditLogEntry;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{ChannelMap, Config};
use crate::pins::{EventDispatcher, HandlerResult, PinEvent};

mod convert;
mod platform;

pub use self::platform::SerenityPlatform;

const INITIAL_LOGIN_RETRY_SECONDS: u64 = 2;
const MAX_LOGIN_RETRY_SECONDS: u64 = 300;
const READY_TIMEOUT_SECONDS: u64 = 30;

pub fn pinup_intents() -> GatewayIntents {
    GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_MODERATION
}

struct PinupEventHandler {
    dispatcher: Arc<EventDispatcher>,
    channel_map: ChannelMap,
    ready_sender: Arc<AsyncMutex<Option<oneshot::Sender<()>>>>,
}

impl PinupEventHandler {
    async fn dispatch(&self, ctx: &SerenityContext, event: PinEvent) {
        let platform = SerenityPlatform::from_context(ctx);
        match self.dispatcher.dispatch(&platform, &event).await {
            Ok(HandlerResult::Ignored) => {}
            Ok(result) => debug!("handled {:?} event: {:?}", event.kind(), result),
            Err(err) => error!("failed to handle {:?} event: {err:#}", event.kind()),
        }
    }
}

fn pins_channel_kind(cache: &Cache, guild_id: GuildId, channel_id: ChannelId) -> Option<ChannelType> {
    let guild = cache.guild(guild_id)?;
    guild.channels.get(&channel_id).map(|channel| channel.kind)
}

#[serenity::async_trait]
impl SerenityEventHandler for PinupEventHandler {
    async fn ready(&self, _ctx: SerenityContext, ready: Ready) {
        info!(
            "discord gateway ready as {} ({})",
            ready.user.name, ready.user.id
        );
        for guild_id in self.channel_map.guilds() {
            if !ready.guilds.iter().any(|guild| guild.id == guild_id) {
                warn!("configured guild_id={} is not visible to the bot", guild_id);
            }
        }
        if let Some(sender) = self.ready_sender.lock().await.take() {
            let _ = sender.send(());
        }
    }

    async fn cache_ready(&self, ctx: SerenityContext, _guilds: Vec<GuildId>) {
        for guild_id in self.channel_map.guilds() {
            let Some(pins_channel) = self.channel_map.pins_channel(guild_id) else {
                continue;
            };
            match pins_channel_kind(&ctx.cache, guild_id, pins_channel) {
                Some(ChannelType::Text | ChannelType::News) => {
                    debug!("pins channel_id={} ready in guild_id={}", pins_channel, guild_id)
                }
                Some(kind) => error!(
                    "pins channel_id={} in guild_id={} is a {:?} channel, not a text channel",
                    pins_channel, guild_id, kind
                ),
                None => error!(
                    "pins channel_id={} does not exist in guild_id={}",
                    pins_channel, guild_id
                ),
            }
        }
    }

    async fn message(&self, ctx: SerenityContext, msg: SerenityMessage) {
        self.dispatch(&ctx, PinEvent::MessageCreated(convert::message_created(&msg)))
            .await;
    }

    async fn reaction_add(&self, ctx: SerenityContext, reaction: Reaction) {
        let Some(event) = convert::reaction_added(&reaction) else {
            debug!(
                "ignoring reaction without a user message_id={}",
                reaction.message_id
            );
            return;
        };
        self.dispatch(&ctx, PinEvent::ReactionAdded(event)).await;
    }

    async fn guild_audit_log_entry_create(
        &self,
        ctx: SerenityContext,
        entry: AuditLogEntry,
        guild_id: GuildId,
    ) {
        let Some(event) = convert::native_pin_entry(&entry, guild_id) else {
            return;
        };
        self.dispatch(&ctx, PinEvent::NativePin(event)).await;
    }
}

struct GatewayState {
    shard_manager: Arc<ShardManager>,
    task: JoinHandle<()>,
}

pub struct DiscordClient {
    config: Arc<Config>,
    dispatcher: Arc<EventDispatcher>,
    gateway: AsyncMutex<Option<GatewayState>>,
}

impl DiscordClient {
    pub fn new(config: Arc<Config>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            config,
            dispatcher,
            gateway: AsyncMutex::new(None),
        }
    }

    pub async fn login(&self) -> Result<()> {
        let mut gateway = self.gateway.lock().await;
        if gateway.is_some() {
            return Ok(());
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let event_handler = PinupEventHandler {
            dispatcher: self.dispatcher.clone(),
            channel_map: self.config.pins.channel_map.clone(),
            ready_sender: Arc::new(AsyncMutex::new(Some(ready_tx))),
        };

        let mut gateway_client =
            SerenityClient::builder(self.config.auth.bot_token.expose_secret(), pinup_intents())
                .event_handler(event_handler)
                .await
                .map_err(|err| anyhow!("failed to build discord gateway client: {err}"))?;
        let shard_manager = gateway_client.shard_manager.clone();

        let task = tokio::spawn(async move {
            if let Err(err) = gateway_client.start_autosharded().await {
                error!("discord gateway stopped: {err}");
            }
        });

        let timeout = std::time::Duration::from_secs(READY_TIMEOUT_SECONDS);
        match tokio::time::timeout(timeout, ready_rx).await {
            Ok(Ok(())) => {
                *gateway = Some(GatewayState {
                    shard_manager,
                    task,
                });
                info!("discord bot login succeeded and gateway is connected");
                Ok(())
            }
            Ok(Err(_)) => {
                task.abort();
                Err(anyhow!("discord gateway exited before receiving Ready event"))
            }
            Err(_) => {
                task.abort();
                Err(anyhow!("timed out waiting for discord Ready event"))
            }
        }
    }

    pub async fn start(&self) -> Result<()> {
        let mut retry_seconds = INITIAL_LOGIN_RETRY_SECONDS;

        loop {
            match self.login().await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    error!(
                        "failed to start discord client: {err}. retrying in {} seconds",
                        retry_seconds
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(retry_seconds)).await;
                    retry_seconds = (retry_seconds * 2).min(MAX_LOGIN_RETRY_SECONDS);
                }
            }
        }
    }

    pub async fn stop(&self) {
        let Some(gateway) = self.gateway.lock().await.take() else {
            return;
        };
        gateway.shard_manager.shutdown_all().await;
        match gateway.task.await {
            Ok(()) => info!("discord gateway task exited"),
            Err(join_err) => warn!("discord gateway task failed: {join_err}"),
        }
    }
}
