//! Tweet text composition.
//!
//! Pure helpers that fit text into the tweet budget, plus [`ContentComposer`],
//! which adds a shortlink and a target hashtag when the shortener cooperates.

use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::BotResult;
use crate::shortener::LinkShortener;
use crate::twitter::parsing::keyword_spans;
use crate::twitter::MAX_TWEET_LENGTH;

/// Body length that leaves room for a shortlink and a hashtag.
pub const CONDENSED_LENGTH: usize = 100;

const ELLIPSIS: &str = "...";

/// Condenses text to [`CONDENSED_LENGTH`] characters.
pub fn condense(text: &str) -> String {
    condense_to(text, CONDENSED_LENGTH)
}

/// Truncates text longer than `max_len` characters to `max_len - 3` characters
/// followed by `...`. Shorter text is returned unchanged.
pub fn condense_to(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut condensed: String = text.chars().take(keep).collect();
    condensed.push_str(ELLIPSIS);
    condensed
}

/// Turns one randomly chosen keyword into a hashtag, in place.
///
/// Returns the text unchanged when it has no candidate keyword.
pub fn hashtagify<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let spans = keyword_spans(text);
    let Some(&(start, _)) = spans.choose(rng) else {
        return text.to_string();
    };
    let mut tagged = String::with_capacity(text.len() + 1);
    tagged.push_str(&text[..start]);
    tagged.push('#');
    tagged.push_str(&text[start..]);
    tagged
}

/// Appends `" <short_url> #<hashtag>"`, or just the link when no hashtag is available.
pub fn append_link(text: &str, short_url: &str, hashtag: Option<&str>) -> String {
    match hashtag {
        Some(tag) => format!("{} {} #{}", text, short_url, tag),
        None => format!("{} {}", text, short_url),
    }
}

/// Item name of an advertised title: text before the first `-`, trimmed.
///
/// Titles usually read "Item Name - Some Description - More Text".
pub fn advertised_title(title: &str) -> String {
    match title.split_once('-') {
        Some((head, _)) if !head.trim().is_empty() => head.trim().to_string(),
        _ => title.trim().to_string(),
    }
}

/// Builds a group thank-you: the prefix followed by `@handle ` tokens while the
/// total stays under the tweet limit. Returns the text and the handles included.
pub fn group_thanks(prefix: &str, handles: &[String]) -> (String, Vec<String>) {
    let mut status_text = format!("{} ", prefix.trim_end());
    let mut included = Vec::new();
    for handle in handles {
        let token = format!("@{} ", handle);
        if status_text.chars().count() + token.chars().count() < MAX_TWEET_LENGTH {
            status_text.push_str(&token);
            included.push(handle.clone());
        }
    }
    (status_text, included)
}

/// Composes outbound content that may carry a shortlink.
pub struct ContentComposer {
    settings: Arc<Settings>,
    shortener: Arc<dyn LinkShortener>,
}

impl ContentComposer {
    pub fn new(settings: Arc<Settings>, shortener: Arc<dyn LinkShortener>) -> Self {
        ContentComposer {
            settings,
            shortener,
        }
    }

    pub async fn shorten_link(&self, url: &str) -> BotResult<String> {
        self.shortener.shorten(url).await
    }

    /// Condenses and hashtagifies `body`, then appends a shortlink and hashtag
    /// when `link` shortens successfully.
    ///
    /// Total length is not re-checked after the link is appended.
    pub async fn compose_final_tweet<R: Rng + Send + ?Sized>(
        &self,
        body: &str,
        link: Option<&str>,
        rng: &mut R,
    ) -> String {
        let text = hashtagify(&condense(body), rng);
        self.with_shortlink(text, link, rng).await
    }

    /// Appends a shortlink and hashtag to already-prepared text.
    ///
    /// A shortening failure is logged and the text is returned without the link.
    pub async fn with_shortlink<R: Rng + Send + ?Sized>(
        &self,
        text: String,
        link: Option<&str>,
        rng: &mut R,
    ) -> String {
        let Some(link) = link.filter(|l| !l.trim().is_empty()) else {
            return text;
        };
        match self.shorten_link(link).await {
            Ok(short_url) => {
                info!("Got shortlink {}", short_url);
                let hashtag = self.settings.random_hashtag(rng).ok();
                append_link(&text, &short_url, hashtag.as_deref())
            }
            Err(e) => {
                warn!("Shortening {} failed, posting without link: {}", link, e);
                text
            }
        }
    }
}
