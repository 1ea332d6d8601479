//! Tweet data model.
//!
//! Tweets arrive from the platform (search, mentions, retweets) and are never
//! mutated afterwards. Outbound text is carried by [`ComposedTweet`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Timestamp format of the v1.1 `created_at` field, e.g. `Wed Oct 10 20:19:24 +0000 2018`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Hard limit on tweet length.
pub const MAX_TWEET_LENGTH: usize = 140;

/// Author of a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwitterUser {
    #[serde(rename = "id_str")]
    pub id: String,
    pub name: String,
    pub screen_name: String,
}

/// A tweet as returned by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    #[serde(rename = "id_str")]
    pub id: String,
    #[serde(alias = "full_text")]
    pub text: String,
    pub user: TwitterUser,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Tweet {
    /// When the tweet was posted, if the platform supplied a parseable timestamp.
    pub fn origin_timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_str(raw, CREATED_AT_FORMAT).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Outbound status text, optionally in reply to another tweet. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedTweet {
    pub text: String,
    pub in_reply_to: Option<String>,
}

impl ComposedTweet {
    pub fn public(text: impl Into<String>) -> Self {
        ComposedTweet {
            text: text.into(),
            in_reply_to: None,
        }
    }

    pub fn reply(text: impl Into<String>, tweet_id: impl Into<String>) -> Self {
        ComposedTweet {
            text: text.into(),
            in_reply_to: Some(tweet_id.into()),
        }
    }

    /// JSON payload for the status-update endpoint.
    pub fn payload(&self) -> serde_json::Value {
        match &self.in_reply_to {
            Some(id) => serde_json::json!({
                "status": self.text,
                "in_reply_to_status_id": id,
            }),
            None => serde_json::json!({ "status": self.text }),
        }
    }
}
