//! Health endpoint reporting live connection counts.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::adapters::realtime::{Channel, EventHub};

/// Shared state for the health endpoint.
#[derive(Clone)]
pub struct HealthState {
    pub hub: Arc<EventHub>,
}

/// `GET /health` - liveness plus connection counts per channel.
pub async fn health(State(state): State<HealthState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "connections": {
            "events": state.hub.connection_count(Channel::Events).await,
            "notifications": state.hub.connection_count(Channel::Notifications).await,
        },
    }))
}

/// Create the health router.
pub fn health_routes() -> Router<HealthState> {
    Router::new().route("/health", get(health))
}
