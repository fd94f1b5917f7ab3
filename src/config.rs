pub use self::channel_map::{ChannelMap, ChannelMapError};
pub use self::parser::{Config, LogFormat, LoggingConfig, PinsConfig};
pub use self::validator::ConfigError;

mod channel_map;
mod parser;
mod validator;
