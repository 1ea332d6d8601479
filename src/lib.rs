//! # Neighborly Library
//!
//! A social-engagement bot for Twitter/X. Scheduled triggers start one action
//! each: thanking users, welcoming people who thanked the bot, retweeting,
//! favoriting, following, pruning non-followers and posting stored content.
//!
//! ## Features
//!
//! - Anti-repetition: no action targets the same user or source twice in a row
//! - Tweet composition within the length budget, with shortlinks and hashtags
//! - Typed parsing of platform responses
//! - A closed trigger bus processed one trigger at a time
//! - PostgreSQL-backed content collections and welcomed set
//!
//! ## Configuration
//!
//! - `xapi_access_token`: Twitter API access token
//! - `BITLY_LOGIN`, `BITLY_API_KEY`: link shortener account
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `SETTINGS_PATH`: settings JSON file (defaults to `settings.json`)
//! - `PORT`: Server port (defaults to 3000)

pub mod bus;
pub mod compose;
pub mod config;
pub mod cronjob;
pub mod db;
pub mod eligibility;
pub mod engagement;
pub mod error;
pub mod handlers;
pub mod shortener;
pub mod twitter;

// Re-export commonly used types and functions
pub use bus::{relay_events, run_trigger_loop, BotEvent, Trigger};
pub use config::{get_server_port, Credentials, Settings};
pub use cronjob::start_trigger_cronjob;
pub use db::{Collection, ContentItem, ContentStore, PgStore, WelcomedKey, WelcomedStore};
pub use eligibility::EligibilityTracker;
pub use engagement::{ActionOutcome, BotContext, Engagement};
pub use error::{BotError, BotResult};
pub use shortener::{BitlyShortener, LinkShortener};
