use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Uploaded documents are written here before extraction.
    pub upload_dir: PathBuf,
    /// Frontend origin allowed by CORS. `None` means permissive.
    pub cors_allowed_origin: Option<String>,
    pub question_budget: u32,
    /// Largest accepted upload request, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".to_string())
                .into(),
            cors_allowed_origin: std::env::var("CORS_ALLOWED_ORIGIN")
                .ok()
                .filter(|origin| !origin.trim().is_empty()),
            question_budget: std::env::var("INTERVIEW_QUESTION_BUDGET")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u32>()
                .context("INTERVIEW_QUESTION_BUDGET must be a non-negative integer")?,
            max_upload_bytes: std::env::var("MAX_UPLOAD_MB")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<usize>()
                .context("MAX_UPLOAD_MB must be a non-negative integer")?
                .saturating_mul(1024 * 1024),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
