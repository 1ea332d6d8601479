//! HTTP route handlers for the neighborly service.
//!
//! A health check and a manual trigger endpoint that enqueues actions on the bus.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedSender;

use crate::bus::Trigger;

/// Builds the router with all routes.
pub fn router(triggers: UnboundedSender<Trigger>) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/triggers/:command", post(handle_trigger))
        .with_state(triggers)
}

/// Handles GET requests to the `/health` endpoint.
///
/// # Example Response
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "neighborly"
/// }
/// ```
pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "healthy", "service": "neighborly"}))
}

/// Handles POST requests to `/triggers/:command`.
///
/// Known commands: `retweet`, `favorite`, `follow`, `content`, `advertising`,
/// `prune`, `retweeters`, `thank-yous`. The action runs asynchronously; the
/// response only confirms it was queued.
pub async fn handle_trigger(
    State(triggers): State<UnboundedSender<Trigger>>,
    Path(command): Path<String>,
) -> (StatusCode, Json<Value>) {
    let Some(trigger) = Trigger::from_command(&command) else {
        warn!("Unknown trigger command: {}", command);
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": "error", "message": "Unknown trigger"})),
        );
    };

    match triggers.send(trigger) {
        Ok(()) => {
            info!("Queued manual trigger: {}", command);
            (
                StatusCode::ACCEPTED,
                Json(json!({"status": "queued", "trigger": command})),
            )
        }
        Err(e) => {
            error!("Trigger bus is closed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "error", "message": "Trigger bus is closed"})),
            )
        }
    }
}
