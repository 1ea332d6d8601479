//! Person-to-person actions: thanking, welcoming, retweeting, favoriting, following.

use log::{error, info, warn};
use serde_json::json;

use super::{ActionOutcome, Engagement};
use crate::bus::BotEvent;
use crate::compose::condense;
use crate::config::Settings;
use crate::error::BotResult;
use crate::twitter::{ComposedTweet, Endpoint, Tweet};

impl Engagement {
    /// Replies to `tweet` thanking its author, unless that author was the last one thanked.
    pub async fn thank_you_tweet(&mut self, tweet: Tweet) -> BotResult<ActionOutcome> {
        if self.tracker.last_thanked_user() == Some(tweet.user.name.as_str()) {
            return Ok(ActionOutcome::Skipped(format!(
                "already thanked {} recently",
                tweet.user.name
            )));
        }

        info!("Posting thank-you tweet at {}", tweet.user.name);
        let phrase = Settings::random_phrase(&self.ctx.settings.thank_yous, "thank_yous", &mut self.rng)?;
        let body = condense(&format!("{} {}", phrase.trim_end(), tweet.user.name));

        let response = self.post_status(&ComposedTweet::reply(body, &tweet.id)).await?;
        response.ensure_ok("thank_you_tweet")?;

        self.tracker.update_last_thanked_user(&tweet);
        Ok(ActionOutcome::Done)
    }

    /// Replies "you're welcome" to someone who thanked the bot, once per user.
    pub async fn youre_welcome_tweet(&mut self, tweet: Tweet) -> BotResult<ActionOutcome> {
        // The user may have been welcomed since this trigger was approved
        if self.tracker.user_has_been_thanked(&tweet.user.id).await? {
            return Ok(ActionOutcome::Skipped(format!(
                "user {} has already been welcomed",
                tweet.user.id
            )));
        }

        info!("Posting you're-welcome tweet at {}", tweet.user.name);
        let phrase = Settings::random_phrase(
            &self.ctx.settings.youre_welcomes,
            "youre_welcomes",
            &mut self.rng,
        )?;
        let body = condense(&format!("{} @{}", phrase.trim_end(), tweet.user.screen_name));

        let response = self.post_status(&ComposedTweet::reply(body, &tweet.id)).await?;
        response.ensure_ok("youre_welcome_tweet")?;

        self.emit(BotEvent::WelcomedUserUpdated(tweet.clone()));
        self.tracker.add_welcomed_user(&tweet).await?;
        info!("Saved welcomed tweet {}", tweet.id);
        Ok(ActionOutcome::Done)
    }

    /// Retweets a random search result whose author was not the last one retweeted.
    ///
    /// The last retweeted user is recorded as soon as the retweet is attempted,
    /// whatever the platform answers.
    pub async fn retweet(&mut self) -> BotResult<ActionOutcome> {
        let tweets = self.search_high_quality_tweets().await?;
        if tweets.is_empty() {
            return Ok(ActionOutcome::Skipped("search returned no tweets".to_string()));
        }

        let last = self.tracker.last_retweeted_user().map(str::to_string);
        let Some(tweet) = self.pick_candidate(&tweets, last.as_deref()) else {
            return Ok(ActionOutcome::Skipped(
                "every result is by the last retweeted user".to_string(),
            ));
        };

        info!("Retweeting tweet {} by {}", tweet.id, tweet.user.name);
        let result = self
            .ctx
            .platform
            .post(&Endpoint::Retweet(tweet.id.clone()), &json!({ "id": tweet.id }))
            .await;
        self.tracker.update_last_retweeted_user(&tweet);

        result?.ensure_ok("retweet")?;
        info!("Successfully retweeted tweet {}", tweet.id);
        Ok(ActionOutcome::Done)
    }

    /// Favorites a random search result whose author was not the last one favorited.
    pub async fn favorite(&mut self) -> BotResult<ActionOutcome> {
        let tweets = self.search_high_quality_tweets().await?;
        if tweets.is_empty() {
            return Ok(ActionOutcome::Skipped("search returned no tweets".to_string()));
        }

        let last = self.tracker.last_favorited_user().map(str::to_string);
        let Some(tweet) = self.pick_candidate(&tweets, last.as_deref()) else {
            return Ok(ActionOutcome::Skipped(
                "every result is by the last favorited user".to_string(),
            ));
        };

        let response = self
            .ctx
            .platform
            .post(&Endpoint::FavoriteCreate, &json!({ "id": tweet.id }))
            .await?;
        if let Err(e) = response.ensure_ok("favorite") {
            error!("Error favoriting tweet {}", tweet.id);
            return Err(e);
        }

        info!("Successfully favorited tweet {}", tweet.id);
        self.tracker.update_last_favorited_user(&tweet);
        Ok(ActionOutcome::Done)
    }

    /// Follows the author of a random search result.
    pub async fn follow(&mut self) -> BotResult<ActionOutcome> {
        let tweets = self.search_high_quality_tweets().await?;
        let Some(tweet) = self.pick_candidate(&tweets, None) else {
            warn!("Follow could not retrieve any tweets from search");
            return Ok(ActionOutcome::Skipped("search returned no tweets".to_string()));
        };

        let response = self
            .ctx
            .platform
            .post(
                &Endpoint::FriendshipCreate,
                &json!({ "user_id": tweet.user.id }),
            )
            .await?;
        response.ensure_ok("follow")?;

        info!("Successfully followed user {}", tweet.user.name);
        Ok(ActionOutcome::Done)
    }
}
