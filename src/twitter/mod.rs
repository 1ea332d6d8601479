//! Twitter/X API integration module.
//!
//! Logical REST endpoints, response parsing, tweet search and the tweet data model.

pub mod api;
pub mod parsing;
pub mod responses;
pub mod search;
mod tweets;

pub use api::{Endpoint, HttpPlatformClient, PlatformClient, RestResponse};
pub use search::{PlatformSearch, SearchProvider};
pub use tweets::{ComposedTweet, Tweet, TwitterUser, MAX_TWEET_LENGTH};
