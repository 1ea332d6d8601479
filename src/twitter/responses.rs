//! Parsers for raw platform responses.
//!
//! Each parser checks the HTTP status, decodes the body and yields typed records.
//! A non-200 status or a malformed body fails the whole response; individual
//! records missing required fields are skipped with a warning.

use log::warn;
use serde::Deserialize;
use serde_json::Value;

use super::api::RestResponse;
use super::tweets::Tweet;
use crate::error::{BotError, BotResult};

/// Parses a JSON array of tweets (mentions, retweets-of-me, retweets of a tweet).
pub fn parse_tweets(response: &RestResponse, operation: &str) -> BotResult<Vec<Tweet>> {
    let body = response.ensure_ok(operation)?;
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(collect_tweets(items, operation)),
        _ => Err(BotError::Parse(format!(
            "{}: expected a JSON array of tweets",
            operation
        ))),
    }
}

/// Parses a JSON array of tweets and returns only the first one.
///
/// Unlike [`parse_tweets`], a malformed first record fails the parse instead of
/// letting the next record stand in for it.
pub fn parse_first_tweet(response: &RestResponse, operation: &str) -> BotResult<Option<Tweet>> {
    let body = response.ensure_ok(operation)?;
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(BotError::Parse(format!(
            "{}: expected a JSON array of tweets",
            operation
        )));
    };
    match items.into_iter().next() {
        Some(first) => serde_json::from_value::<Tweet>(first)
            .map(Some)
            .map_err(|e| BotError::Parse(format!("{}: malformed first tweet: {}", operation, e))),
        None => Ok(None),
    }
}

/// Parses a search response: `{"statuses": [...]}`, or a bare array.
pub fn parse_search_results(response: &RestResponse) -> BotResult<Vec<Tweet>> {
    let body = response.ensure_ok("search")?;
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Array(items) => Ok(collect_tweets(items, "search")),
        Value::Object(mut map) => match map.remove("statuses") {
            Some(Value::Array(items)) => Ok(collect_tweets(items, "search")),
            _ => Err(BotError::Parse(
                "search: response has no 'statuses' array".to_string(),
            )),
        },
        _ => Err(BotError::Parse(
            "search: unexpected response shape".to_string(),
        )),
    }
}

fn collect_tweets(items: Vec<Value>, operation: &str) -> Vec<Tweet> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Tweet>(item) {
            Ok(tweet) => Some(tweet),
            Err(e) => {
                warn!("{}: skipping malformed tweet: {}", operation, e);
                None
            }
        })
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserId {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
struct IdList {
    ids: Vec<UserId>,
}

/// Parses a followers/friends ids response: `{"ids": [...]}`.
///
/// Ids may be numbers or strings; both are returned as strings.
pub fn parse_id_list(response: &RestResponse, operation: &str) -> BotResult<Vec<String>> {
    let body = response.ensure_ok(operation)?;
    let list: IdList = serde_json::from_str(body)
        .map_err(|e| BotError::Parse(format!("{}: {}", operation, e)))?;
    Ok(list
        .ids
        .into_iter()
        .map(|id| match id {
            UserId::Text(s) => s,
            UserId::Number(n) => n.to_string(),
        })
        .collect())
}

/// Distinct author screen names, in first-seen order.
pub fn distinct_screen_names(tweets: &[Tweet]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for tweet in tweets {
        if !names.contains(&tweet.user.screen_name) {
            names.push(tweet.user.screen_name.clone());
        }
    }
    names
}
