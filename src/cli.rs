use std::path::PathBuf;

use clap::Parser;

/// Command line surface. Every value can also come from the environment or,
/// except for the file path itself, from the YAML file given by `--config`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "discord-pinup",
    version,
    about = "Mirror reaction-pinned Discord messages into a pins channel"
)]
pub struct CliArgs {
    /// Discord bot token.
    #[arg(env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Guild to pins-channel map, `guildId:channelId[,guildId:channelId...]`.
    #[arg(env = "DISCORD_CHANNEL_MAP")]
    pub channel_map: Option<String>,

    /// How many pins-channel messages to scan when looking for a preview.
    #[arg(long, env = "DISCORD_HISTORY_LIMIT")]
    pub history_limit: Option<usize>,

    /// Optional YAML config file.
    #[arg(long, env = "CONFIG_PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,

    /// One of `pretty`, `compact` or `json`.
    #[arg(long, env = "LOG_FORMAT")]
    pub log_format: Option<String>,
}
