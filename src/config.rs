//! Configuration module for the neighborly service.
//!
//! Static settings (phrase banks, target hashtags, trigger schedule) come from a
//! JSON file; credentials and connection strings come from environment variables.

use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::env;
use std::path::Path;

use crate::error::{BotError, BotResult};

/// Default location of the settings file when `SETTINGS_PATH` is unset.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Read-only bot settings.
///
/// Loaded once at startup and shared behind an `Arc` by every component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Hashtags the bot searches for and appends to its own posts
    #[serde(default)]
    pub target_hashtags: Vec<String>,
    /// Phrases used when thanking a single user
    #[serde(default)]
    pub thank_yous: Vec<String>,
    /// Phrases used when replying to someone who thanked the bot
    #[serde(default)]
    pub youre_welcomes: Vec<String>,
    /// Phrases that open a group thank-you for retweeters
    #[serde(default)]
    pub retweet_thank_yous: Vec<String>,
    /// Cron expressions for the built-in trigger source
    #[serde(default)]
    pub schedule: Schedule,
}

/// One cron expression per payload-less trigger.
///
/// Expressions use the 7-field syntax understood by `tokio-cron-scheduler`
/// (sec min hour day-of-month month day-of-week year).
#[derive(Debug, Clone, Deserialize)]
pub struct Schedule {
    #[serde(default = "default_retweet")]
    pub retweet: String,
    #[serde(default = "default_favorite")]
    pub favorite: String,
    #[serde(default = "default_follow")]
    pub follow: String,
    #[serde(default = "default_content")]
    pub content: String,
    #[serde(default = "default_advertising")]
    pub advertising: String,
    #[serde(default = "default_prune")]
    pub prune: String,
    #[serde(default = "default_retweeters")]
    pub retweeters: String,
    #[serde(default = "default_thank_yous")]
    pub thank_yous: String,
}

fn default_retweet() -> String {
    "0 0/45 * * * * *".to_string()
}
fn default_favorite() -> String {
    "0 0/20 * * * * *".to_string()
}
fn default_follow() -> String {
    "0 0 0/2 * * * *".to_string()
}
fn default_content() -> String {
    "0 0/30 * * * * *".to_string()
}
fn default_advertising() -> String {
    "0 0 0/6 * * * *".to_string()
}
fn default_prune() -> String {
    "0 0 0/4 * * * *".to_string()
}
fn default_retweeters() -> String {
    "0 0 0/3 * * * *".to_string()
}
fn default_thank_yous() -> String {
    "0 0/15 * * * * *".to_string()
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule {
            retweet: default_retweet(),
            favorite: default_favorite(),
            follow: default_follow(),
            content: default_content(),
            advertising: default_advertising(),
            prune: default_prune(),
            retweeters: default_retweeters(),
            thank_yous: default_thank_yous(),
        }
    }
}

impl Settings {
    /// Parses settings from a JSON string.
    pub fn from_json(raw: &str) -> BotResult<Self> {
        let settings: Settings = serde_json::from_str(raw)
            .map_err(|e| BotError::Config(format!("Invalid settings JSON: {}", e)))?;
        settings.validate();
        Ok(settings)
    }

    /// Loads settings from the file named by `SETTINGS_PATH`, or `settings.json`.
    ///
    /// # Returns
    ///
    /// - `Ok(Settings)`: If the file exists and is valid JSON
    /// - `Err(BotError::Config)`: If the file is missing or malformed
    pub fn from_env() -> BotResult<Self> {
        let path = env::var("SETTINGS_PATH").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());
        Self::from_path(&path)
    }

    /// Loads settings from an explicit path.
    pub fn from_path(path: impl AsRef<Path>) -> BotResult<Self> {
        let path = path.as_ref();
        info!("Loading bot settings from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
            error!("Failed to read settings file {}: {}", path.display(), e);
            BotError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Warns about every empty phrase bank. Actions that need one fail later with `NotFound`.
    pub fn validate(&self) {
        let banks = [
            ("target_hashtags", &self.target_hashtags),
            ("thank_yous", &self.thank_yous),
            ("youre_welcomes", &self.youre_welcomes),
            ("retweet_thank_yous", &self.retweet_thank_yous),
        ];
        for (name, bank) in banks {
            if bank.is_empty() {
                warn!("Settings '{}' is empty; actions that need it will abort", name);
            } else {
                debug!("Settings '{}' has {} entries", name, bank.len());
            }
        }
    }

    /// Picks a target hashtag uniformly at random, without any leading `#`.
    pub fn random_hashtag<R: Rng + ?Sized>(&self, rng: &mut R) -> BotResult<String> {
        pick(&self.target_hashtags, "target_hashtags", rng)
            .map(|tag| tag.trim_start_matches('#').to_string())
    }

    /// Picks a phrase uniformly at random from the named bank.
    pub fn random_phrase<R: Rng + ?Sized>(
        bank: &[String],
        bank_name: &str,
        rng: &mut R,
    ) -> BotResult<String> {
        pick(bank, bank_name, rng)
    }
}

fn pick<R: Rng + ?Sized>(bank: &[String], bank_name: &str, rng: &mut R) -> BotResult<String> {
    bank.choose(rng)
        .cloned()
        .ok_or_else(|| BotError::NotFound(format!("settings '{}' is empty", bank_name)))
}

/// Credentials for the external services, read from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth 2.0 User Context access token for the platform API
    pub access_token: String,
    /// bit.ly account login
    pub bitly_login: String,
    /// bit.ly API key
    pub bitly_api_key: String,
    /// PostgreSQL connection string
    pub database_url: String,
}

impl Credentials {
    /// Loads every credential from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `xapi_access_token`: Twitter API access token
    /// - `BITLY_LOGIN`, `BITLY_API_KEY`: link shortener account
    /// - `DATABASE_URL`: PostgreSQL connection string
    pub fn from_env() -> BotResult<Self> {
        info!("Loading credentials from environment variables");

        let access_token = required_var("xapi_access_token")?;
        if access_token.len() < 10 {
            warn!(
                "Access token seems unusually short ({} characters)",
                access_token.len()
            );
        }

        Ok(Credentials {
            access_token,
            bitly_login: required_var("BITLY_LOGIN")?,
            bitly_api_key: required_var("BITLY_API_KEY")?,
            database_url: required_var("DATABASE_URL")?,
        })
    }
}

fn required_var(name: &str) -> BotResult<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => {
            debug!("{} (masked): {}", name, mask_secret(&value));
            Ok(value)
        }
        Ok(_) => {
            error!("{} is set but empty", name);
            Err(BotError::Config(format!("{} cannot be empty", name)))
        }
        Err(e) => {
            error!("Failed to load {} from environment: {}", name, e);
            Err(BotError::Config(format!(
                "Missing {} environment variable: {}",
                name, e
            )))
        }
    }
}

/// Masks a secret for logging, keeping at most the first and last 8 characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();
    if len > 16 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[len - 8..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        let head: String = chars.iter().take(len.min(8) / 2).collect();
        format!("{}...", head)
    }
}

/// Gets the server port from the `PORT` environment variable, defaulting to 3000.
///
/// Unparseable values fall back to the default with a warning.
pub fn get_server_port() -> u16 {
    match env::var("PORT") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("PORT '{}' is not a valid port, using 3000", raw);
            3000
        }),
        Err(_) => 3000,
    }
}
