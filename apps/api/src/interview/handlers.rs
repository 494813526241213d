use axum::{extract::State, Json};
use tracing::info;

use crate::errors::{AppError, AppJson};
use crate::interview::controller::run_turn;
use crate::interview::session::{ChatRequest, ChatResponse};
use crate::state::AppState;

/// POST /chat
///
/// Advances the interview by one turn. The client sends the whole visible
/// session and gets the updated session back.
pub async fn handle_chat(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let index = state
        .documents
        .current()
        .await
        .ok_or_else(|| AppError::Validation("No document uploaded yet.".to_string()))?;

    let turn = request.into_turn();
    info!(
        "Chat turn on {}: question_count={}, answered={}",
        index.filename(),
        turn.question_count,
        turn.past_responses.len()
    );

    let outcome = run_turn(index.as_ref(), state.llm.as_ref(), &state.interview, turn).await?;
    Ok(Json(outcome.response))
}
