//! Axum route handler for document upload.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::document::ingest::{ingest_document, save_upload};
use crate::errors::AppError;
use crate::state::AppState;

/// Multipart field carrying the document.
const FILE_FIELD: &str = "pdf";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub first_question: String,
    pub past_questions: Vec<String>,
    pub question_count: u32,
}

/// POST /upload_pdf
///
/// Stores and indexes the uploaded document, replacing any previous one, and
/// returns the greeting that opens the interview.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, data) = read_file_field(&mut multipart).await?;
    info!("Received upload '{}' ({} bytes)", filename, data.len());

    let saved = save_upload(&state.config.upload_dir, &filename, &data).await?;
    info!("Saved upload to {}", saved.display());

    let splitter = state.splitter;
    let ingested = tokio::task::spawn_blocking(move || ingest_document(&filename, &data, &splitter))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Ingestion task failed: {e}")))??;

    let greeting = ingested.greeting;
    state.documents.replace(ingested.index).await;
    info!("Interview ready for {}", ingested.candidate_name);

    Ok(Json(UploadResponse {
        message: "Document uploaded and processed successfully.".to_string(),
        first_question: greeting,
        past_questions: Vec::new(),
        question_count: 0,
    }))
}

/// Finds the file part. Missing part or empty filename is a client error.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok((filename, data));
    }

    Err(AppError::Validation("No PDF file part".to_string()))
}

/// Body-limit overflows surface as 413; every other multipart fault is the
/// client's malformed request.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Uploaded file exceeds the size limit".to_string())
    } else {
        AppError::Validation(format!("{context}: {err}"))
    }
}
