use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::document::index::DocumentIndex;
use crate::document::splitter::TextSplitter;
use crate::interview::controller::InterviewSettings;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Text generation backend. `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
    pub config: Config,
    pub documents: DocumentSlot,
    pub splitter: TextSplitter,
    pub interview: InterviewSettings,
}

/// The single active document. Uploading replaces it; chat turns take a
/// snapshot and release the lock before generating.
#[derive(Clone, Default)]
pub struct DocumentSlot {
    inner: Arc<RwLock<Option<Arc<DocumentIndex>>>>,
}

impl DocumentSlot {
    pub async fn current(&self) -> Option<Arc<DocumentIndex>> {
        self.inner.read().await.clone()
    }

    pub async fn replace(&self, index: DocumentIndex) {
        let mut guard = self.inner.write().await;
        if let Some(previous) = guard.as_ref() {
            info!("Discarding previously indexed document {}", previous.filename());
        }
        *guard = Some(Arc::new(index));
    }
}
