#![forbid(unsafe_code)]

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod discord;
mod pins;
mod utils;

use config::Config;
use pins::PinContext;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::CliArgs::parse();
    let config = Arc::new(Config::load(&args)?);
    utils::logging::init_tracing(&config.logging);

    info!(
        "discord-pinup starting up guilds={} history_limit={}",
        config.pins.channel_map.len(),
        config.pins.history_limit
    );

    let ctx = Arc::new(PinContext::from_config(&config.pins));
    let dispatcher = Arc::new(pins::default_dispatcher(ctx));
    info!("registered {} event handlers", dispatcher.handler_count());

    let discord_client = discord::DiscordClient::new(config.clone(), dispatcher);

    tokio::select! {
        result = discord_client.start() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("received ctrl-c before discord login completed");
            info!("discord-pinup shutting down");
            return Ok(());
        }
    }

    tokio::signal::ctrl_c().await?;
    info!("received ctrl-c");
    discord_client.stop().await;

    info!("discord-pinup shutting down");
    Ok(())
}
