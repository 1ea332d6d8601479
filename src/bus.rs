//! Trigger bus.
//!
//! Inbound triggers start exactly one engagement action each. Outbound events
//! tell the trigger source what the bot found or confirmed. Triggers are
//! processed one at a time, in arrival order.

use log::{info, warn};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::engagement::Engagement;
use crate::twitter::Tweet;

/// Named triggers, one per engagement action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    ThankYouTweet(Tweet),
    Retweet,
    Favorite,
    Follow,
    ContentRichTweet,
    AdvertisingTweet,
    Prune,
    CheckForRetweeters,
    YoureWelcomeTweet(Tweet),
    CheckForThankYouTweets,
    UpdateWelcomedUsers(Tweet),
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::ThankYouTweet(_) => "thank_you_tweet",
            Trigger::Retweet => "retweet",
            Trigger::Favorite => "favorite",
            Trigger::Follow => "follow",
            Trigger::ContentRichTweet => "content_rich_tweet",
            Trigger::AdvertisingTweet => "advertising_tweet",
            Trigger::Prune => "prune",
            Trigger::CheckForRetweeters => "check_for_retweeters",
            Trigger::YoureWelcomeTweet(_) => "youre_welcome_tweet",
            Trigger::CheckForThankYouTweets => "check_for_thank_you_tweets",
            Trigger::UpdateWelcomedUsers(_) => "update_welcomed_users",
        }
    }

    /// Maps a command name to a trigger that needs no payload.
    pub fn from_command(command: &str) -> Option<Trigger> {
        match command {
            "retweet" => Some(Trigger::Retweet),
            "favorite" => Some(Trigger::Favorite),
            "follow" => Some(Trigger::Follow),
            "content" => Some(Trigger::ContentRichTweet),
            "advertising" => Some(Trigger::AdvertisingTweet),
            "prune" => Some(Trigger::Prune),
            "retweeters" => Some(Trigger::CheckForRetweeters),
            "thank-yous" => Some(Trigger::CheckForThankYouTweets),
            _ => None,
        }
    }
}

/// Events the bot emits back to its trigger source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    /// Mentions that thank the bot and await approval for a reply
    SeekApprovalForYoureWelcome(Vec<Tweet>),
    /// A you're-welcome reply was posted for this tweet
    WelcomedUserUpdated(Tweet),
}

/// Runs every received trigger to completion before taking the next.
///
/// Returns when all senders are dropped.
pub async fn run_trigger_loop(mut engagement: Engagement, mut triggers: UnboundedReceiver<Trigger>) {
    info!("Trigger loop started");
    while let Some(trigger) = triggers.recv().await {
        engagement.dispatch(trigger).await;
    }
    info!("Trigger bus closed, trigger loop stopping");
}

/// Default approval policy: every thank-you candidate becomes a you're-welcome trigger.
pub async fn relay_events(mut events: UnboundedReceiver<BotEvent>, triggers: UnboundedSender<Trigger>) {
    while let Some(event) = events.recv().await {
        match event {
            BotEvent::SeekApprovalForYoureWelcome(tweets) => {
                info!("Approving {} you're-welcome replies", tweets.len());
                for tweet in tweets {
                    if triggers.send(Trigger::YoureWelcomeTweet(tweet)).is_err() {
                        warn!("Trigger bus closed, dropping approval");
                        return;
                    }
                }
            }
            BotEvent::WelcomedUserUpdated(tweet) => {
                info!(
                    "Welcomed @{} (tweet {})",
                    tweet.user.screen_name, tweet.id
                );
            }
        }
    }
}
