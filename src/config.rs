//! Configuration and settings management
//!
//! Loads settings from optional config files and the environment.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default quiet interval for media groups, in milliseconds.
pub const DEFAULT_MEDIA_GROUP_QUIET_MS: u64 = 1000;

/// Application settings
#[derive(Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Telegram Bot API token
    #[serde(alias = "telegram_token")]
    pub bot_token: String,

    /// Link every detected link is replaced with
    pub replacement_link: String,

    /// Quiet interval after the last album item before the album is sent
    #[serde(default = "default_media_group_quiet_ms")]
    pub media_group_quiet_ms: u64,
}

const fn default_media_group_quiet_ms() -> u64 {
    DEFAULT_MEDIA_GROUP_QUIET_MS
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"[REDACTED]")
            .field("replacement_link", &self.replacement_link)
            .field("media_group_quiet_ms", &self.media_group_quiet_ms)
            .finish()
    }
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use link_swap_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// settings.validate().expect("Invalid configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Not checked into git
            .add_source(File::with_name("config/local").required(false))
            // Eg. `APP__REPLACEMENT_LINK=... ./target/app`
            .add_source(Environment::with_prefix("APP").separator("__"))
            // BOT_TOKEN, REPLACEMENT_LINK, ...; empty values count as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?
            .try_deserialize()
    }

    /// Rejects settings the bot cannot start with.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::Message` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Message("bot_token must not be empty".into()));
        }
        if self.replacement_link.trim().is_empty() {
            return Err(ConfigError::Message(
                "replacement_link must not be empty".into(),
            ));
        }
        if self.media_group_quiet_ms == 0 {
            return Err(ConfigError::Message(
                "media_group_quiet_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Media group quiet interval as a `Duration`.
    #[must_use]
    pub const fn media_group_quiet_interval(&self) -> Duration {
        Duration::from_millis(self.media_group_quiet_ms)
    }
}
