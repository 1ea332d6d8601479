//! # Neighborly
//!
//! Runs the social-engagement bot: a cron-driven trigger source, the serial
//! trigger loop, and an HTTP server for health checks and manual triggers.
//!
//! ## Environment Variables
//!
//! - `xapi_access_token`: Twitter API access token
//! - `BITLY_LOGIN`, `BITLY_API_KEY`: link shortener account
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `SETTINGS_PATH`: settings JSON file (defaults to `settings.json`)
//! - `PORT`: Server port (defaults to 3000)
//! - `RUST_LOG`: log level, e.g. `RUST_LOG=info`

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use neighborly::db::get_db_pool;
use neighborly::handlers::router;
use neighborly::twitter::{HttpPlatformClient, PlatformClient, PlatformSearch};
use neighborly::{
    get_server_port, relay_events, run_trigger_loop, start_trigger_cronjob, BitlyShortener,
    BotContext, Credentials, Engagement, PgStore, Settings,
};

#[tokio::main]
async fn main() {
    // Initialize the logging system
    env_logger::init();

    if let Err(e) = run().await {
        error!("neighborly stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = Arc::new(Settings::from_env()?);
    let credentials = Credentials::from_env()?;

    let pool = get_db_pool(&credentials.database_url).await?;
    let store = Arc::new(PgStore::new(pool));
    store.ensure_schema().await?;

    let platform: Arc<dyn PlatformClient> =
        Arc::new(HttpPlatformClient::new(credentials.access_token.clone()));
    let search = Arc::new(PlatformSearch::new(platform.clone()));
    let shortener = Arc::new(BitlyShortener::new(
        credentials.bitly_login.clone(),
        credentials.bitly_api_key.clone(),
    ));

    let (trigger_tx, trigger_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let ctx = BotContext {
        settings: settings.clone(),
        platform,
        search,
        shortener,
        content: store.clone(),
        events: event_tx,
    };
    let engagement = Engagement::new(ctx, store);

    let trigger_loop = tokio::spawn(run_trigger_loop(engagement, trigger_rx));
    tokio::spawn(relay_events(event_rx, trigger_tx.clone()));

    let scheduler = start_trigger_cronjob(&settings.schedule, trigger_tx.clone()).await?;
    scheduler.start().await?;
    info!("Trigger schedule started");

    let app = router(trigger_tx).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let port = get_server_port();
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    info!("Starting neighborly server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = result {
                error!("HTTP server error: {}", e);
            }
        }
        _ = trigger_loop => {
            info!("Trigger loop completed");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    Ok(())
}
