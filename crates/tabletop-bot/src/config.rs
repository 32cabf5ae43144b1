//! Bot configuration, loaded from a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tabletop_throttle::ThrottleConfig;

use crate::error::{Error, Result};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "TABLETOP_CONFIG";

/// Config file used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Configuration for the bot engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix that marks a message as a command
    pub command_prefix: String,

    /// Group whose members may run moderator commands
    pub bot_admins: String,

    /// Voice channel cloned for new groups
    pub template_voice_channel: String,

    /// Text channel cloned for new groups
    pub template_text_channel: String,

    /// Category archived text channels move into
    pub archive_category: String,

    /// Channels where anything but a well-formed command counts as an incident
    pub monitored_channels: Vec<String>,

    /// Warnings by increasing severity. `{user}` becomes the author's mention.
    pub admonishments: Vec<String>,

    /// Escalation timing for monitored channels
    pub throttle: ThrottleConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            bot_admins: "bot-admins".to_string(),
            template_voice_channel: "voice-template".to_string(),
            template_text_channel: "text-template".to_string(),
            archive_category: "archive".to_string(),
            monitored_channels: Vec::new(),
            admonishments: vec![
                "{user}, please keep this channel on topic.".to_string(),
                "{user}, this channel is for announcements only. Please take chatter elsewhere."
                    .to_string(),
                "{user}, repeated off-topic posts here may lead to moderator action.".to_string(),
            ],
            throttle: ThrottleConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded bot config");
        Ok(config)
    }

    /// Load the file named by `TABLETOP_CONFIG`, or `./config.json`.
    pub fn from_env() -> Result<Self> {
        Self::load(Self::path_from_env())
    }

    pub fn path_from_env() -> PathBuf {
        std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Whether chatter in `channel` is throttled.
    pub fn is_monitored(&self, channel: &str) -> bool {
        self.monitored_channels.iter().any(|c| c == channel)
    }

    pub fn validate(&self) -> Result<()> {
        if self.command_prefix.trim().is_empty() {
            return Err(Error::Config("command_prefix must not be empty".into()));
        }
        if self.bot_admins.is_empty() {
            return Err(Error::Config("bot_admins must name a group".into()));
        }
        if self.admonishments.is_empty() {
            return Err(Error::Config(
                "admonishments must contain at least one message".into(),
            ));
        }
        self.throttle.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "bot_admins": "mods",
                "monitored_channels": ["announcements"],
                "throttle": {{ "cooldown_seconds": 20, "escalation_interval_seconds": 5 }}
            }}"#
        )
        .unwrap();

        let config = BotConfig::load(file.path()).unwrap();
        assert_eq!(config.bot_admins, "mods");
        assert_eq!(config.command_prefix, "!");
        assert!(config.is_monitored("announcements"));
        assert!(!config.is_monitored("general"));
        assert_eq!(config.throttle, ThrottleConfig::new(20.0, 5.0));
    }

    #[test]
    fn load_rejects_zero_cooldown() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "throttle": {{ "cooldown_seconds": 0 }} }}"#).unwrap();

        assert!(matches!(
            BotConfig::load(file.path()),
            Err(Error::Throttle(_))
        ));
    }

    #[test]
    fn empty_admonishments_rejected() {
        let config = BotConfig {
            admonishments: vec![],
            ..BotConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            BotConfig::load("/definitely/not/here/config.json"),
            Err(Error::Io(_))
        ));
    }
}
