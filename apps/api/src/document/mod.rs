// Document ingestion: text extraction, chunking, and the in-memory similarity index
// the interview retrieves its grounding context from.

pub mod handlers;
pub mod index;
pub mod ingest;
pub mod splitter;

/// One chunk of the uploaded document. Immutable once indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChunk {
    pub text: String,
    /// 1-based page the chunk was cut from.
    pub page_number: usize,
    /// Position of the chunk within the whole document.
    pub chunk_index: usize,
}

/// Similarity search over an indexed document.
pub trait Retriever: Send + Sync {
    /// Returns up to `k` chunks, most similar to `query` first.
    fn retrieve(&self, query: &str, k: usize) -> Vec<&DocumentChunk>;
}
