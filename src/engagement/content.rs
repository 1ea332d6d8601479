//! Content posting: articles from the content collection and advertised items.

use log::{error, info};

use super::{ActionOutcome, Engagement};
use crate::compose::{advertised_title, condense};
use crate::db::Collection;
use crate::eligibility::EligibilityTracker;
use crate::error::{BotError, BotResult};
use crate::twitter::ComposedTweet;

impl Engagement {
    /// Posts a stored article, preferring a different source than the last post.
    pub async fn post_content_rich_tweet(&mut self) -> BotResult<ActionOutcome> {
        let last_source = self.tracker.last_source().map(str::to_string);
        info!("Posting content-rich tweet (last source: {:?})", last_source);

        let doc = self
            .ctx
            .content
            .find_untweeted(Collection::Articles, last_source.as_deref())
            .await?;

        let doc = match doc {
            None => return Err(BotError::NotFound("no untweeted article".to_string())),
            Some(doc) if !EligibilityTracker::is_a_valid_content_doc(Some(&doc)) => {
                error!("Article {} lacks a title, origin or link. Bailing.", doc.id);
                return Err(BotError::Validation(format!(
                    "article {} lacks a title, origin or link",
                    doc.id
                )));
            }
            Some(doc) => doc,
        };

        self.ctx
            .content
            .mark_tweeted(Collection::Articles, doc.id)
            .await?;
        self.tracker.update_last_source(&doc.origin);

        let text = self
            .composer
            .compose_final_tweet(&doc.title, Some(doc.link.as_str()), &mut self.rng)
            .await;
        let response = self.post_status(&ComposedTweet::public(text)).await?;
        response.ensure_ok("content_rich_tweet")?;

        Ok(ActionOutcome::Done)
    }

    /// Posts an advertised item: its name, a shortlink when available and a hashtag.
    pub async fn post_advertising_tweet(&mut self) -> BotResult<ActionOutcome> {
        info!("Posting advertising tweet");

        let doc = self
            .ctx
            .content
            .find_untweeted(Collection::AdvertisedItems, None)
            .await?
            .ok_or_else(|| BotError::NotFound("no untweeted advertised item".to_string()))?;

        if doc.title.trim().is_empty() {
            return Err(BotError::Validation(format!(
                "advertised item {} has no title",
                doc.id
            )));
        }

        let text = condense(&advertised_title(&doc.title));

        self.ctx
            .content
            .mark_tweeted(Collection::AdvertisedItems, doc.id)
            .await?;

        let text = self
            .composer
            .with_shortlink(text, Some(doc.link.as_str()), &mut self.rng)
            .await;
        let response = self.post_status(&ComposedTweet::public(text)).await?;
        response.ensure_ok("advertising_tweet")?;

        Ok(ActionOutcome::Done)
    }
}
