//! Actions driven by the bot's own timeline and follower graph.

use log::info;
use rand::seq::SliceRandom;
use serde_json::json;
use std::collections::HashSet;

use super::{ActionOutcome, Engagement};
use crate::bus::BotEvent;
use crate::compose::group_thanks;
use crate::config::Settings;
use crate::db::WelcomedKey;
use crate::eligibility::EligibilityTracker;
use crate::error::{BotError, BotResult};
use crate::twitter::responses::{
    distinct_screen_names, parse_first_tweet, parse_id_list, parse_tweets,
};
use crate::twitter::{ComposedTweet, Endpoint, Tweet};

impl Engagement {
    /// Unfollows one random account that does not follow the bot back.
    pub async fn prune(&mut self) -> BotResult<ActionOutcome> {
        info!("Attempting to prune non-followers");

        let response = self.ctx.platform.get(&Endpoint::FollowersIds).await?;
        let followers = parse_id_list(&response, "followers_ids")?;
        if followers.is_empty() {
            return Err(BotError::NotFound(
                "bot currently has no followers".to_string(),
            ));
        }

        let response = self.ctx.platform.get(&Endpoint::FriendsIds).await?;
        let friends = parse_id_list(&response, "friends_ids")?;

        let followers: HashSet<String> = followers.into_iter().collect();
        let non_followers: Vec<String> = friends
            .into_iter()
            .filter(|id| !followers.contains(id))
            .collect();
        let Some(target) = non_followers.choose(&mut self.rng).cloned() else {
            return Ok(ActionOutcome::Skipped(
                "every followed account follows back".to_string(),
            ));
        };

        info!("Pruning non-following account {}", target);
        let response = self
            .ctx
            .platform
            .post(&Endpoint::FriendshipDestroy, &json!({ "user_id": target }))
            .await?;
        response.ensure_ok("prune")?;

        info!("Successfully pruned non-follower {}", target);
        Ok(ActionOutcome::Done)
    }

    /// Finds who retweeted the bot's latest retweeted tweet and thanks them.
    pub async fn determine_retweeters(&mut self) -> BotResult<ActionOutcome> {
        info!("Determining recent retweeters to thank");

        let response = self.ctx.platform.get(&Endpoint::RetweetsOfMe).await?;
        let Some(target) = parse_first_tweet(&response, "retweets_of_me")? else {
            return Ok(ActionOutcome::Skipped(
                "no retweets of the bot at this time".to_string(),
            ));
        };

        let response = self
            .ctx
            .platform
            .get(&Endpoint::RetweetsOf(target.id.clone()))
            .await?;
        let retweets = parse_tweets(&response, "retweets_of_tweet")?;
        let retweeters = distinct_screen_names(&retweets);
        if retweeters.is_empty() {
            return Ok(ActionOutcome::Skipped(format!(
                "tweet {} has no retweeters",
                target.id
            )));
        }

        self.thanks_for_retweeting(retweeters).await
    }

    /// Posts one group thank-you naming as many not-yet-thanked retweeters as fit.
    pub async fn thanks_for_retweeting(&mut self, candidates: Vec<String>) -> BotResult<ActionOutcome> {
        let eligible = self.tracker.filter_retweeters_to_thank(&candidates).await?;
        if eligible.is_empty() {
            return Ok(ActionOutcome::Skipped(
                "no valid retweeters to thank right now".to_string(),
            ));
        }
        info!("Thanking retweeters: {:?}", eligible);

        let prefix = Settings::random_phrase(
            &self.ctx.settings.retweet_thank_yous,
            "retweet_thank_yous",
            &mut self.rng,
        )?;
        let (status_text, included) = group_thanks(&prefix, &eligible);
        if included.is_empty() {
            return Ok(ActionOutcome::Skipped(
                "no retweeter handle fits in one tweet".to_string(),
            ));
        }

        let response = self
            .post_status(&ComposedTweet::public(status_text))
            .await?;
        response.ensure_ok("thanks_for_retweeting")?;

        self.tracker.update_last_thanked_users(&included).await?;
        Ok(ActionOutcome::Done)
    }

    /// Looks for mentions that thank the bot and asks for approval to answer them.
    pub async fn check_for_thank_you_tweets(&mut self) -> BotResult<ActionOutcome> {
        let response = self.ctx.platform.get(&Endpoint::MentionsTimeline).await?;
        let mentions = parse_tweets(&response, "mentions_timeline")?;
        if mentions.is_empty() {
            return Ok(ActionOutcome::Skipped(
                "no tweets mentioning the bot at this time".to_string(),
            ));
        }

        let welcomed = self.tracker.welcomed_keys().await?;
        let thank_yous: Vec<Tweet> = mentions
            .into_iter()
            .filter(|tweet| EligibilityTracker::is_a_thank_you(tweet))
            .filter(|tweet| {
                let seen = welcomed.contains(&WelcomedKey::Tweet(tweet.id.clone()).to_string())
                    || welcomed.contains(&WelcomedKey::User(tweet.user.id.clone()).to_string());
                if seen {
                    info!("Already welcomed user from tweet {}", tweet.id);
                }
                !seen
            })
            .collect();

        if thank_yous.is_empty() {
            return Ok(ActionOutcome::Skipped(
                "no thank-you tweets found at this time".to_string(),
            ));
        }

        info!("Found {} thank-you tweets", thank_yous.len());
        self.emit(BotEvent::SeekApprovalForYoureWelcome(thank_yous));
        Ok(ActionOutcome::Done)
    }

    /// Records the tweet and its author in the welcomed set.
    pub async fn update_welcomed_users(&mut self, tweet: Tweet) -> BotResult<ActionOutcome> {
        self.tracker.add_welcomed_user(&tweet).await?;
        info!("Updated welcomed users with tweet {}", tweet.id);
        Ok(ActionOutcome::Done)
    }
}
