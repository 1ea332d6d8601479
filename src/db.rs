//! Persistence for content items and welcomed users.
//!
//! Content items (articles and advertised items) are ingested elsewhere; the bot
//! only reads them and flips `tweeted` from false to true. The welcomed set
//! remembers who already received a thank-you or you're-welcome so nobody is
//! addressed twice.

use async_trait::async_trait;
use log::{debug, info, warn};
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use std::fmt;

use crate::error::BotResult;

/// The content collections the bot posts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Articles,
    AdvertisedItems,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Articles => "articles",
            Collection::AdvertisedItems => "advertised_items",
        }
    }
}

/// An article or advertised item owned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub link: String,
    pub origin: String,
    pub tweeted: bool,
}

/// A member of the welcomed set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WelcomedKey {
    /// A tweet that was already answered
    Tweet(String),
    /// A user (by id) who was already answered
    User(String),
    /// A retweeter (by screen name) who was already thanked
    Handle(String),
}

impl fmt::Display for WelcomedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WelcomedKey::Tweet(id) => write!(f, "tweet:{}", id),
            WelcomedKey::User(id) => write!(f, "user:{}", id),
            WelcomedKey::Handle(name) => write!(f, "handle:{}", name.to_lowercase()),
        }
    }
}

/// Read/mark access to the content collections.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Finds one untweeted item, skipping items whose origin equals `exclude_origin`.
    async fn find_untweeted(
        &self,
        collection: Collection,
        exclude_origin: Option<&str>,
    ) -> BotResult<Option<ContentItem>>;

    /// Sets `tweeted = true`. Marking an already-tweeted item is not an error.
    async fn mark_tweeted(&self, collection: Collection, id: i64) -> BotResult<()>;
}

/// Durable welcomed set.
#[async_trait]
pub trait WelcomedStore: Send + Sync {
    async fn is_welcomed(&self, key: &WelcomedKey) -> BotResult<bool>;
    async fn welcomed_keys(&self) -> BotResult<HashSet<String>>;
    /// Idempotent insert.
    async fn add_welcomed(&self, keys: &[WelcomedKey]) -> BotResult<()>;
}

/// Establishes a connection to the PostgreSQL database.
pub async fn get_db_pool(database_url: &str) -> BotResult<PgPool> {
    info!("Connecting to PostgreSQL database");
    debug!(
        "Database URL (masked): {}...",
        database_url.chars().take(20).collect::<String>()
    );

    let pool = PgPool::connect(database_url).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(pool)
}

/// PostgreSQL implementation of both stores.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    /// Creates the content and welcomed tables if they do not exist.
    pub async fn ensure_schema(&self) -> BotResult<()> {
        info!("Ensuring database schema exists");
        for collection in [Collection::Articles, Collection::AdvertisedItems] {
            let statement = format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    id BIGSERIAL PRIMARY KEY,
                    title TEXT,
                    link TEXT,
                    origin TEXT,
                    tweeted BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                collection.table()
            );
            sqlx::query(&statement).execute(&self.pool).await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS welcomed (
                key TEXT PRIMARY KEY,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema is ready");
        Ok(())
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn find_untweeted(
        &self,
        collection: Collection,
        exclude_origin: Option<&str>,
    ) -> BotResult<Option<ContentItem>> {
        info!(
            "Querying {} for an untweeted item (excluding origin {:?})",
            collection.table(),
            exclude_origin
        );

        let statement = format!(
            r#"
            SELECT id,
                   COALESCE(title, '') AS title,
                   COALESCE(link, '') AS link,
                   COALESCE(origin, '') AS origin,
                   tweeted
            FROM {}
            WHERE tweeted = FALSE
              AND ($1::TEXT IS NULL OR origin IS DISTINCT FROM $1)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
            collection.table()
        );

        let row = sqlx::query(&statement)
            .bind(exclude_origin)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let item = ContentItem {
                    id: row.get("id"),
                    title: row.get("title"),
                    link: row.get("link"),
                    origin: row.get("origin"),
                    tweeted: row.get("tweeted"),
                };
                debug!("Found untweeted item {} in {}", item.id, collection.table());
                Ok(Some(item))
            }
            None => {
                warn!("No untweeted items left in {}", collection.table());
                Ok(None)
            }
        }
    }

    async fn mark_tweeted(&self, collection: Collection, id: i64) -> BotResult<()> {
        let statement = format!("UPDATE {} SET tweeted = TRUE WHERE id = $1", collection.table());
        let result = sqlx::query(&statement).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            warn!("mark_tweeted: no row {} in {}", id, collection.table());
        }
        info!("Marked record {} in {} as tweeted", id, collection.table());
        Ok(())
    }
}

#[async_trait]
impl WelcomedStore for PgStore {
    async fn is_welcomed(&self, key: &WelcomedKey) -> BotResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM welcomed WHERE key = $1)")
                .bind(key.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn welcomed_keys(&self) -> BotResult<HashSet<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM welcomed")
            .fetch_all(&self.pool)
            .await?;
        debug!("Loaded {} welcomed keys", keys.len());
        Ok(keys.into_iter().collect())
    }

    async fn add_welcomed(&self, keys: &[WelcomedKey]) -> BotResult<()> {
        for key in keys {
            sqlx::query("INSERT INTO welcomed (key) VALUES ($1) ON CONFLICT (key) DO NOTHING")
                .bind(key.to_string())
                .execute(&self.pool)
                .await?;
        }
        info!("Recorded {} welcomed keys", keys.len());
        Ok(())
    }
}
