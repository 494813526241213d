pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::document::handlers::handle_upload;
use crate::interview::handlers::handle_chat;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Paths kept stable for the interview frontend.
        .route("/upload_pdf", post(handle_upload).layer(upload_limit))
        .route("/chat", post(handle_chat))
        .with_state(state)
}
