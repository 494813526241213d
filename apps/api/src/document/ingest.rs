//! Document ingestion. Turns an uploaded file into a queryable index plus the
//! personalised greeting that opens the interview.
//!
//! Flow: save upload → extract per-page text → split + index → extract candidate name.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::document::index::DocumentIndex;
use crate::document::splitter::TextSplitter;

/// Used when no name can be found on the first page.
pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

/// A first line is only taken as a name when it has at most this many words.
const MAX_NAME_LINE_TOKENS: usize = 4;

const PAGE_BREAK: char = '\u{c}';

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No text could be extracted from '{filename}'")]
    NoText { filename: String },

    #[error("Failed to read PDF: {0}")]
    Pdf(String),

    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of ingesting one upload.
#[derive(Debug)]
pub struct IngestedDocument {
    pub index: DocumentIndex,
    pub candidate_name: String,
    pub greeting: String,
}

/// Opening message of every interview. The interview only starts once the
/// candidate replies "start".
pub fn greeting(candidate_name: &str) -> String {
    format!("Hello {candidate_name}, welcome to your interview! Let's begin. Reply 'start' to begin.")
}

/// Extracts text, indexes it, and builds the greeting. CPU-bound; call from a
/// blocking task.
pub fn ingest_document(
    filename: &str,
    data: &[u8],
    splitter: &TextSplitter,
) -> Result<IngestedDocument, IngestError> {
    let pages = extract_pages(filename, data)?;
    debug!("Extracted {} pages from {}", pages.len(), filename);

    let index = DocumentIndex::build(filename, &pages, splitter);
    if index.chunks().is_empty() {
        return Err(IngestError::NoText {
            filename: filename.to_string(),
        });
    }
    info!("Indexed {} into {} chunks", filename, index.chunks().len());

    let candidate_name = extract_candidate_name(pages.first().map(String::as_str).unwrap_or(""));
    info!("Candidate name resolved to '{}'", candidate_name);

    Ok(IngestedDocument {
        greeting: greeting(&candidate_name),
        index,
        candidate_name,
    })
}

/// Returns the text of each page. PDFs are extracted page by page with
/// `pdf-extract`; anything else is read as (lossy) UTF-8 with form feeds
/// marking page boundaries.
pub fn extract_pages(filename: &str, data: &[u8]) -> Result<Vec<String>, IngestError> {
    if is_pdf(filename, data) {
        let pages = pdf_extract::extract_text_from_mem_by_pages(data)
            .map_err(|e| IngestError::Pdf(e.to_string()))?;
        // pdf-extract opens every page with blank lines.
        return Ok(pages
            .into_iter()
            .map(|page| page.trim_start_matches(['\n', '\r']).to_string())
            .collect());
    }

    let text = String::from_utf8_lossy(data);
    Ok(text.split(PAGE_BREAK).map(String::from).collect())
}

fn is_pdf(filename: &str, data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
        || Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn name_label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Name[:\s]+([A-Z][a-zA-Z]+(?: [A-Z][a-zA-Z]+)*)")
            .expect("name label pattern is valid")
    })
}

/// Best-effort candidate name from the first page.
///
/// 1. A `Name:`-style label followed by capitalised words.
/// 2. Otherwise the first line, if it has 1–4 words that all start uppercase.
/// 3. Otherwise `"Candidate"`.
pub fn extract_candidate_name(first_page: &str) -> String {
    if let Some(name) = name_label_pattern()
        .captures(first_page)
        .and_then(|caps| caps.get(1))
    {
        return name.as_str().to_string();
    }

    let first_line = first_page.split('\n').next().unwrap_or("");
    let tokens: Vec<&str> = first_line.split_whitespace().collect();
    let looks_like_name = !tokens.is_empty()
        && tokens.len() <= MAX_NAME_LINE_TOKENS
        && tokens
            .iter()
            .all(|t| t.chars().next().is_some_and(char::is_uppercase));

    if looks_like_name {
        first_line.trim().to_string()
    } else {
        DEFAULT_CANDIDATE_NAME.to_string()
    }
}

/// Reduces an uploaded filename to a safe single path component
/// (ASCII letters, digits, `.`, `-`, `_`).
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Writes the raw upload under `upload_dir`, replacing any file of the same name.
pub async fn save_upload(
    upload_dir: &Path,
    filename: &str,
    data: &[u8],
) -> Result<PathBuf, IngestError> {
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(sanitize_filename(filename));
    tokio::fs::write(&path, data).await?;
    debug!("Saved upload to {}", path.display());
    Ok(path)
}
