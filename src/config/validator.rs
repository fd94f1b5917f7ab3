use secrecy::ExposeSecret;
use thiserror::Error;

use super::{ChannelMapError, Config};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    ChannelMap(#[from] ChannelMapError),
    #[error("missing required setting: {0}")]
    MissingValue(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.bot_token.expose_secret().trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "auth.bot_token cannot be empty".to_string(),
            ));
        }

        if self.pins.channel_map.is_empty() {
            return Err(ConfigError::ChannelMap(ChannelMapError::Empty));
        }

        if self.pins.history_limit == 0 {
            return Err(ConfigError::InvalidConfig(
                "pins.history_limit must be at least 1".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "logging.level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
