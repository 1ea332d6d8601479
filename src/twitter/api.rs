//! Core Twitter API plumbing.
//!
//! This module defines the logical endpoints the bot calls, the [`PlatformClient`]
//! seam every action talks through, and the reqwest-backed implementation.

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde_json::Value;

use crate::error::{BotError, BotResult};

const API_BASE: &str = "https://api.twitter.com/1.1";

/// Sanitizes text for safe logging by truncating and escaping control characters.
///
/// # Parameters
///
/// - `text`: The text to sanitize
/// - `max_len`: Maximum number of characters before truncation
///
/// # Returns
///
/// A sanitized string safe for logging
pub fn sanitize_for_logging(text: &str, max_len: usize) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '?',
            c => c,
        })
        .collect();

    if sanitized.chars().count() > max_len {
        let head: String = sanitized.chars().take(max_len).collect();
        format!("{}... [truncated, {} total bytes]", head, text.len())
    } else {
        sanitized
    }
}

/// Builds the Authorization header for OAuth 2.0 User Context authentication.
pub fn build_oauth2_user_context_header(access_token: &str) -> String {
    format!("Bearer {}", access_token)
}

/// The platform endpoints the bot uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    StatusUpdate,
    Retweet(String),
    FavoriteCreate,
    FriendshipCreate,
    FriendshipDestroy,
    FollowersIds,
    FriendsIds,
    RetweetsOfMe,
    RetweetsOf(String),
    MentionsTimeline,
    Search(String),
}

impl Endpoint {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::StatusUpdate => "status_update",
            Endpoint::Retweet(_) => "retweet",
            Endpoint::FavoriteCreate => "favorite_create",
            Endpoint::FriendshipCreate => "friendship_create",
            Endpoint::FriendshipDestroy => "friendship_destroy",
            Endpoint::FollowersIds => "followers_ids",
            Endpoint::FriendsIds => "friends_ids",
            Endpoint::RetweetsOfMe => "retweets_of_me",
            Endpoint::RetweetsOf(_) => "retweets_of_tweet",
            Endpoint::MentionsTimeline => "mentions_timeline",
            Endpoint::Search(_) => "search",
        }
    }

    pub fn url(&self) -> String {
        match self {
            Endpoint::StatusUpdate => format!("{}/statuses/update.json", API_BASE),
            Endpoint::Retweet(id) => format!("{}/statuses/retweet/{}.json", API_BASE, id),
            Endpoint::FavoriteCreate => format!("{}/favorites/create.json", API_BASE),
            Endpoint::FriendshipCreate => format!("{}/friendships/create.json", API_BASE),
            Endpoint::FriendshipDestroy => format!("{}/friendships/destroy.json", API_BASE),
            Endpoint::FollowersIds => {
                format!("{}/followers/ids.json?stringify_ids=true", API_BASE)
            }
            Endpoint::FriendsIds => format!("{}/friends/ids.json?stringify_ids=true", API_BASE),
            Endpoint::RetweetsOfMe => format!("{}/statuses/retweets_of_me.json", API_BASE),
            Endpoint::RetweetsOf(id) => format!("{}/statuses/retweets/{}.json", API_BASE, id),
            Endpoint::MentionsTimeline => {
                format!("{}/statuses/mentions_timeline.json", API_BASE)
            }
            Endpoint::Search(keyword) => format!(
                "{}/search/tweets.json?q={}&result_type=popular",
                API_BASE,
                urlencoding::encode(keyword)
            ),
        }
    }
}

/// A raw platform response: HTTP status plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub status: u16,
    pub body: String,
}

impl RestResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        RestResponse {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Returns the body when the status is 200, otherwise a `Status` error.
    pub fn ensure_ok(&self, operation: &str) -> BotResult<&str> {
        if self.is_ok() {
            Ok(&self.body)
        } else {
            Err(BotError::Status {
                operation: operation.to_string(),
                status: self.status,
            })
        }
    }
}

/// Logical REST calls against the social platform.
///
/// Implementations return `Ok` for any HTTP status; only transport failures are errors.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    async fn get(&self, endpoint: &Endpoint) -> BotResult<RestResponse>;
    async fn post(&self, endpoint: &Endpoint, payload: &Value) -> BotResult<RestResponse>;
}

/// reqwest-backed platform client using a user-context bearer token.
pub struct HttpPlatformClient {
    client: Client,
    access_token: String,
}

impl HttpPlatformClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        HttpPlatformClient {
            client: Client::new(),
            access_token: access_token.into(),
        }
    }

    async fn send(
        &self,
        request_builder: reqwest::RequestBuilder,
        operation: &str,
    ) -> BotResult<RestResponse> {
        let response = request_builder
            .header(
                "Authorization",
                build_oauth2_user_context_header(&self.access_token),
            )
            .send()
            .await
            .map_err(|e| {
                error!("Request for '{}' failed: {}", operation, e);
                BotError::transport(operation, e)
            })?;

        let status = response.status().as_u16();
        info!(
            "Received response with status: {} for operation: {}",
            status, operation
        );

        let body = response
            .text()
            .await
            .map_err(|e| BotError::transport(operation, e))?;

        if status == 200 {
            debug!(
                "Response summary for '{}': {} bytes received",
                operation,
                body.len()
            );
        } else {
            debug!(
                "Error response for '{}': {}",
                operation,
                sanitize_for_logging(&body, 200)
            );
        }

        Ok(RestResponse { status, body })
    }
}

#[async_trait]
impl PlatformClient for HttpPlatformClient {
    async fn get(&self, endpoint: &Endpoint) -> BotResult<RestResponse> {
        debug!("GET {}", endpoint.url());
        let request_builder = self.client.get(endpoint.url());
        self.send(request_builder, endpoint.name()).await
    }

    async fn post(&self, endpoint: &Endpoint, payload: &Value) -> BotResult<RestResponse> {
        debug!("POST {}", endpoint.url());
        let request_builder = self
            .client
            .post(endpoint.url())
            .header("Content-Type", "application/json")
            .json(payload);
        self.send(request_builder, endpoint.name()).await
    }
}
