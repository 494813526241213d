use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and the currently indexed document, if any.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let document = state.documents.current().await.map(|index| index.summary());

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interviewer-api",
        "document": document
    }))
}
