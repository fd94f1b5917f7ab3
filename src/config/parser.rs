use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use secrecy::SecretString;
use serde::Deserialize;

use super::{ChannelMap, ConfigError};
use crate::cli::CliArgs;

pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug)]
pub struct Config {
    pub auth: AuthConfig,
    pub pins: PinsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug)]
pub struct AuthConfig {
    pub bot_token: SecretString,
}

#[derive(Debug, Clone)]
pub struct PinsConfig {
    pub channel_map: ChannelMap,
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::InvalidConfig(format!(
                "unknown log format `{other}`, expected pretty, compact or json"
            ))),
        }
    }
}

/// On-disk shape of the YAML config file. Every key is optional so that the
/// command line and environment can fill the gaps.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    auth: FileAuthConfig,
    #[serde(default)]
    pins: FilePinsConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
struct FileAuthConfig {
    #[serde(default)]
    bot_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FilePinsConfig {
    #[serde(default)]
    channel_map: Option<FileChannelMap>,
    #[serde(default)]
    history_limit: Option<usize>,
}

/// `channel_map` may be written inline (`"1:2,3:4"`) or as a YAML mapping.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileChannelMap {
    Inline(String),
    Table(BTreeMap<u64, u64>),
}

impl Config {
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::from_path(path)?,
            None => FileConfig::default(),
        };
        Self::from_layers(file, args)
    }

    fn from_layers(file: FileConfig, args: &CliArgs) -> Result<Self, ConfigError> {
        let bot_token = args
            .token
            .clone()
            .or(file.auth.bot_token)
            .ok_or(ConfigError::MissingValue("bot token"))?;

        let channel_map = match (&args.channel_map, file.pins.channel_map) {
            (Some(inline), _) => inline.parse::<ChannelMap>()?,
            (None, Some(FileChannelMap::Inline(inline))) => inline.parse::<ChannelMap>()?,
            (None, Some(FileChannelMap::Table(table))) => ChannelMap::from_pairs(table)?,
            (None, None) => return Err(ConfigError::MissingValue("channel map")),
        };

        let history_limit = args
            .history_limit
            .or(file.pins.history_limit)
            .unwrap_or(DEFAULT_HISTORY_LIMIT);

        let mut logging = file.logging;
        if let Some(level) = &args.log_level {
            logging.level = level.clone();
        }
        if let Some(format) = &args.log_format {
            logging.format = format.parse()?;
        }

        let config = Self {
            auth: AuthConfig {
                bot_token: SecretString::from(bot_token),
            },
            pins: PinsConfig {
                channel_map,
                history_limit,
            },
            logging,
        };
        config.validate()?;
        Ok(config)
    }
}

impl FileConfig {
    fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
