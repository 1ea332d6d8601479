//! Engagement actions.
//!
//! Each trigger runs one action through fetch, decide, act and settle. Actions
//! never retry; any error ends the action and is logged by [`Engagement::dispatch`],
//! which is the boundary no error crosses.

mod content;
mod network;
mod social;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::bus::{BotEvent, Trigger};
use crate::compose::ContentComposer;
use crate::config::Settings;
use crate::db::{ContentStore, WelcomedStore};
use crate::eligibility::EligibilityTracker;
use crate::error::{BotError, BotResult};
use crate::shortener::LinkShortener;
use crate::twitter::api::sanitize_for_logging;
use crate::twitter::{ComposedTweet, Endpoint, PlatformClient, RestResponse, SearchProvider, Tweet};

/// Everything an action may touch, injected once at startup.
#[derive(Clone)]
pub struct BotContext {
    pub settings: Arc<Settings>,
    pub platform: Arc<dyn PlatformClient>,
    pub search: Arc<dyn SearchProvider>,
    pub shortener: Arc<dyn LinkShortener>,
    pub content: Arc<dyn ContentStore>,
    pub events: UnboundedSender<BotEvent>,
}

/// How an action ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The external action was carried out
    Done,
    /// Nothing eligible to act on; no side effects
    Skipped(String),
    /// An error stopped the action
    Failed(String),
}

/// The engagement orchestrator: owns the eligibility state and runs actions.
pub struct Engagement {
    ctx: BotContext,
    tracker: EligibilityTracker,
    composer: ContentComposer,
    rng: StdRng,
}

impl Engagement {
    pub fn new(ctx: BotContext, welcomed: Arc<dyn WelcomedStore>) -> Self {
        let composer = ContentComposer::new(ctx.settings.clone(), ctx.shortener.clone());
        Engagement {
            ctx,
            tracker: EligibilityTracker::new(welcomed),
            composer,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn tracker(&self) -> &EligibilityTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut EligibilityTracker {
        &mut self.tracker
    }

    /// Runs the action for `trigger`, logging and absorbing any failure.
    pub async fn dispatch(&mut self, trigger: Trigger) -> ActionOutcome {
        let name = trigger.name();
        info!("Trigger received: {}", name);

        let result = match trigger {
            Trigger::ThankYouTweet(tweet) => self.thank_you_tweet(tweet).await,
            Trigger::Retweet => self.retweet().await,
            Trigger::Favorite => self.favorite().await,
            Trigger::Follow => self.follow().await,
            Trigger::ContentRichTweet => self.post_content_rich_tweet().await,
            Trigger::AdvertisingTweet => self.post_advertising_tweet().await,
            Trigger::Prune => self.prune().await,
            Trigger::CheckForRetweeters => self.determine_retweeters().await,
            Trigger::YoureWelcomeTweet(tweet) => self.youre_welcome_tweet(tweet).await,
            Trigger::CheckForThankYouTweets => self.check_for_thank_you_tweets().await,
            Trigger::UpdateWelcomedUsers(tweet) => self.update_welcomed_users(tweet).await,
        };

        match result {
            Ok(ActionOutcome::Done) => {
                info!("{}: done", name);
                ActionOutcome::Done
            }
            Ok(ActionOutcome::Skipped(reason)) => {
                warn!("{}: skipped: {}", name, reason);
                ActionOutcome::Skipped(reason)
            }
            Ok(ActionOutcome::Failed(reason)) => {
                error!("{}: failed: {}", name, reason);
                ActionOutcome::Failed(reason)
            }
            Err(e) => {
                error!("{}: failed: {}", name, e);
                ActionOutcome::Failed(e.to_string())
            }
        }
    }

    /// Searches a random target hashtag for candidate tweets.
    async fn search_high_quality_tweets(&mut self) -> BotResult<Vec<Tweet>> {
        let hashtag = self.ctx.settings.random_hashtag(&mut self.rng)?;
        self.ctx.search.query(&format!("#{}", hashtag)).await
    }

    /// Picks a tweet uniformly at random, skipping the given author.
    fn pick_candidate(&mut self, tweets: &[Tweet], exclude_author: Option<&str>) -> Option<Tweet> {
        let candidates: Vec<&Tweet> = tweets
            .iter()
            .filter(|t| Some(t.user.name.as_str()) != exclude_author)
            .collect();
        candidates.choose(&mut self.rng).map(|t| (*t).clone())
    }

    async fn post_status(&self, tweet: &ComposedTweet) -> BotResult<RestResponse> {
        if tweet.text.trim().is_empty() {
            return Err(BotError::Validation("no status text to post".to_string()));
        }
        info!(
            "Posting status: {}",
            sanitize_for_logging(&tweet.text, 160)
        );
        self.ctx
            .platform
            .post(&Endpoint::StatusUpdate, &tweet.payload())
            .await
    }

    fn emit(&self, event: BotEvent) {
        if self.ctx.events.send(event).is_err() {
            warn!("No listener for outbound bot events");
        }
    }
}
