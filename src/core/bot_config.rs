use std::fs;
use std::time::Duration;

use serde::Deserialize;

use crate::error::StartupError;

#[derive(Deserialize, Debug)]
pub struct BotConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    pub tokens: Tokens,
    pub database: Database,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub messages: Messages,
}

#[derive(Deserialize, Debug)]
pub struct Tokens {
    pub discord: String,
}

#[derive(Deserialize, Debug)]
pub struct Database {
    pub postgres: String,
}

/// Discord webhooks that receive copies of the bot's own logs.
#[derive(Deserialize, Debug, Default)]
pub struct Logging {
    pub important_logs: Option<String>,
    pub info_logs: Option<String>,
}

/// Delays, in seconds, before messages get cleaned up.
#[derive(Deserialize, Debug)]
pub struct Messages {
    #[serde(default = "default_error_delete_delay")]
    pub error_delete_delay: u64,
    #[serde(default = "default_command_delete_delay")]
    pub command_delete_delay: u64,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            error_delete_delay: default_error_delete_delay(),
            command_delete_delay: default_command_delete_delay(),
        }
    }
}

impl Messages {
    pub fn error_delay(&self) -> Duration {
        Duration::from_secs(self.error_delete_delay)
    }

    pub fn command_delay(&self) -> Duration {
        Duration::from_secs(self.command_delete_delay)
    }
}

fn default_prefix() -> String {
    String::from(".")
}

fn default_error_delete_delay() -> u64 {
    60
}

fn default_command_delete_delay() -> u64 {
    3
}

impl BotConfig {
    pub fn new(filename: &str) -> Result<Self, StartupError> {
        let config_file = fs::read_to_string(filename).map_err(|_| StartupError::NoConfig)?;
        BotConfig::parse(&config_file)
    }

    fn parse(raw: &str) -> Result<Self, StartupError> {
        toml::from_str(raw).map_err(|e| StartupError::InvalidConfig(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = BotConfig::parse(
            r#"
            [tokens]
            discord = "token"

            [database]
            postgres = "postgres://localhost/clocktower"
            "#,
        )
        .unwrap();
        assert_eq!(config.prefix, ".");
        assert_eq!(config.messages.error_delay(), Duration::from_secs(60));
        assert_eq!(config.messages.command_delay(), Duration::from_secs(3));
        assert!(config.logging.info_logs.is_none());
    }

    #[test]
    fn everything_can_be_overridden() {
        let config = BotConfig::parse(
            r#"
            prefix = "!"

            [tokens]
            discord = "token"

            [database]
            postgres = "postgres://localhost/clocktower"

            [logging]
            important_logs = "https://discord.com/api/webhooks/1/important"

            [messages]
            error_delete_delay = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.messages.error_delete_delay, 30);
        assert_eq!(config.messages.command_delete_delay, 3);
        assert!(config.logging.important_logs.is_some());
    }

    #[test]
    fn missing_token_is_invalid() {
        assert!(matches!(
            BotConfig::parse("[database]\npostgres = \"x\""),
            Err(StartupError::InvalidConfig(_))
        ));
    }
}
