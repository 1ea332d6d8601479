//! Anti-repetition and eligibility rules.
//!
//! Remembers the last user each kind of action targeted and the last content
//! source posted, and fronts the durable welcomed set. State changes only after
//! an action settles.

use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use crate::db::{ContentItem, WelcomedKey, WelcomedStore};
use crate::error::BotResult;
use crate::twitter::parsing::is_thank_you_text;
use crate::twitter::Tweet;

pub struct EligibilityTracker {
    last_thanked_user: Option<String>,
    last_retweeted_user: Option<String>,
    last_favorited_user: Option<String>,
    last_source: Option<String>,
    welcomed: Arc<dyn WelcomedStore>,
}

impl EligibilityTracker {
    pub fn new(welcomed: Arc<dyn WelcomedStore>) -> Self {
        EligibilityTracker {
            last_thanked_user: None,
            last_retweeted_user: None,
            last_favorited_user: None,
            last_source: None,
            welcomed,
        }
    }

    pub fn last_thanked_user(&self) -> Option<&str> {
        self.last_thanked_user.as_deref()
    }

    pub fn update_last_thanked_user(&mut self, tweet: &Tweet) {
        debug!("Last thanked user is now {}", tweet.user.name);
        self.last_thanked_user = Some(tweet.user.name.clone());
    }

    /// Records a group of thanked retweeters: the last one becomes the last
    /// thanked user and every handle joins the welcomed set.
    pub async fn update_last_thanked_users(&mut self, screen_names: &[String]) -> BotResult<()> {
        if let Some(last) = screen_names.last() {
            self.last_thanked_user = Some(last.clone());
        }
        let keys: Vec<WelcomedKey> = screen_names
            .iter()
            .map(|name| WelcomedKey::Handle(name.clone()))
            .collect();
        self.welcomed.add_welcomed(&keys).await
    }

    pub fn last_retweeted_user(&self) -> Option<&str> {
        self.last_retweeted_user.as_deref()
    }

    pub fn update_last_retweeted_user(&mut self, tweet: &Tweet) {
        self.last_retweeted_user = Some(tweet.user.name.clone());
    }

    pub fn last_favorited_user(&self) -> Option<&str> {
        self.last_favorited_user.as_deref()
    }

    pub fn update_last_favorited_user(&mut self, tweet: &Tweet) {
        self.last_favorited_user = Some(tweet.user.name.clone());
    }

    pub fn last_source(&self) -> Option<&str> {
        self.last_source.as_deref()
    }

    pub fn update_last_source(&mut self, origin: &str) {
        info!("Last content source is now {}", origin);
        self.last_source = Some(origin.to_string());
    }

    /// Whether the user (by id) has already been welcomed. Store failures propagate.
    pub async fn user_has_been_thanked(&self, user_id: &str) -> BotResult<bool> {
        self.welcomed
            .is_welcomed(&WelcomedKey::User(user_id.to_string()))
            .await
    }

    /// Drops already-thanked retweeters and duplicates, keeping input order.
    pub async fn filter_retweeters_to_thank(&self, candidates: &[String]) -> BotResult<Vec<String>> {
        let welcomed = self.welcomed.welcomed_keys().await?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut eligible = Vec::new();
        for name in candidates {
            let key = WelcomedKey::Handle(name.clone()).to_string();
            if welcomed.contains(&key) {
                debug!("Retweeter @{} was already thanked", name);
                continue;
            }
            if seen.insert(key) {
                eligible.push(name.clone());
            }
        }
        Ok(eligible)
    }

    /// Adds the tweet and its author (by id and by handle) to the welcomed set.
    /// Safe to repeat.
    pub async fn add_welcomed_user(&self, tweet: &Tweet) -> BotResult<()> {
        self.welcomed
            .add_welcomed(&[
                WelcomedKey::Tweet(tweet.id.clone()),
                WelcomedKey::User(tweet.user.id.clone()),
                WelcomedKey::Handle(tweet.user.screen_name.clone()),
            ])
            .await
    }

    /// Snapshot of the welcomed set, for filtering a batch of mentions.
    pub async fn welcomed_keys(&self) -> BotResult<HashSet<String>> {
        self.welcomed.welcomed_keys().await
    }

    /// True iff the document exists and has a non-empty title, origin and link.
    pub fn is_a_valid_content_doc(doc: Option<&ContentItem>) -> bool {
        match doc {
            Some(doc) => {
                !doc.title.trim().is_empty()
                    && !doc.origin.trim().is_empty()
                    && !doc.link.trim().is_empty()
            }
            None => false,
        }
    }

    pub fn is_a_thank_you(tweet: &Tweet) -> bool {
        is_thank_you_text(&tweet.text)
    }
}
