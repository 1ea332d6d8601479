//! Tweet search.
//!
//! Retweet, favorite and follow all start from a keyword search. The provider is
//! a trait so the ranking source can be swapped without touching the actions.

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use super::api::{sanitize_for_logging, Endpoint, PlatformClient};
use super::responses::parse_search_results;
use super::tweets::Tweet;
use crate::error::BotResult;

/// Given a keyword, returns candidate tweets.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn query(&self, keyword: &str) -> BotResult<Vec<Tweet>>;
}

/// Searches through the platform's own search endpoint.
pub struct PlatformSearch {
    platform: Arc<dyn PlatformClient>,
}

impl PlatformSearch {
    pub fn new(platform: Arc<dyn PlatformClient>) -> Self {
        PlatformSearch { platform }
    }
}

#[async_trait]
impl SearchProvider for PlatformSearch {
    async fn query(&self, keyword: &str) -> BotResult<Vec<Tweet>> {
        info!(
            "Searching for tweets matching '{}'",
            sanitize_for_logging(keyword, 50)
        );
        let response = self
            .platform
            .get(&Endpoint::Search(keyword.to_string()))
            .await?;
        let tweets = parse_search_results(&response)?;
        if tweets.is_empty() {
            warn!("Search for '{}' returned no tweets", keyword);
        } else {
            info!("Search for '{}' returned {} tweets", keyword, tweets.len());
        }
        Ok(tweets)
    }
}
