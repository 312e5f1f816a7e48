use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service version plus which optional backends are wired up.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-intel-api",
        "storage": if state.storage.has_remote() { "s3" } else { "local" },
        "llm_configured": state.config.llm_configured(),
    }))
}
