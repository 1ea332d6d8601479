//! Link shortening.
//!
//! Posts carry a shortlink when one can be obtained. A failed shortening never
//! blocks a post; callers fall back to posting without the link.

use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{BotError, BotResult};

const BITLY_SHORTEN_URL: &str = "https://api-ssl.bitly.com/v3/shorten";

/// Given a long URL, returns a short URL.
#[async_trait]
pub trait LinkShortener: Send + Sync {
    async fn shorten(&self, url: &str) -> BotResult<String>;
}

#[derive(Deserialize)]
struct BitlyResponse {
    status_code: Option<u16>,
    data: Option<BitlyData>,
}

#[derive(Deserialize)]
struct BitlyData {
    url: Option<String>,
}

/// bit.ly v3 shortener authenticated with login and API key.
pub struct BitlyShortener {
    client: Client,
    login: String,
    api_key: String,
}

impl BitlyShortener {
    pub fn new(login: impl Into<String>, api_key: impl Into<String>) -> Self {
        BitlyShortener {
            client: Client::new(),
            login: login.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl LinkShortener for BitlyShortener {
    async fn shorten(&self, url: &str) -> BotResult<String> {
        info!("Requesting shortlink for {}", url);

        let response = self
            .client
            .get(BITLY_SHORTEN_URL)
            .query(&[
                ("login", self.login.as_str()),
                ("apiKey", self.api_key.as_str()),
                ("longUrl", url),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| BotError::transport("bitly_shorten", e))?;

        let status = response.status().as_u16();
        if status != 200 {
            error!("bit.ly returned HTTP {}", status);
            return Err(BotError::Status {
                operation: "bitly_shorten".to_string(),
                status,
            });
        }

        let body: BitlyResponse = response
            .json()
            .await
            .map_err(|e| BotError::Parse(format!("bitly_shorten: {}", e)))?;

        if let Some(code) = body.status_code.filter(|code| *code != 200) {
            return Err(BotError::Status {
                operation: "bitly_shorten".to_string(),
                status: code,
            });
        }

        body.data
            .and_then(|data| data.url)
            .filter(|short| !short.is_empty())
            .ok_or_else(|| BotError::Parse("bitly_shorten: response has no data.url".to_string()))
    }
}
