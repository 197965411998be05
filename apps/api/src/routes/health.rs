use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Service identity plus whether the store answers a ping.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let store = match state.store.ping().await {
        Ok(()) => "ok",
        Err(e) => {
            warn!("Health check: store unreachable: {e}");
            "unreachable"
        }
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "store": store
    }))
}
