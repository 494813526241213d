//! In-memory TF-IDF index over the chunks of a single uploaded document.
//!
//! The vocabulary is built from the document's own chunks, so retrieval is
//! local and deterministic. Queries with no known terms (including the empty
//! query used to open the interview) score every chunk 0.0 and fall back to
//! document order.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::splitter::TextSplitter;
use crate::document::{DocumentChunk, Retriever};

/// Tokens shorter than this are ignored.
const MIN_TOKEN_LEN: usize = 2;

#[derive(Debug)]
pub struct DocumentIndex {
    filename: String,
    chunks: Vec<DocumentChunk>,
    vectors: Vec<Vec<f32>>,
    token_to_idx: HashMap<String, usize>,
    idf: Vec<f32>,
    indexed_at: DateTime<Utc>,
}

/// Summary surfaced on the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct IndexSummary {
    pub filename: String,
    pub chunks: usize,
    pub indexed_at: DateTime<Utc>,
}

impl DocumentIndex {
    /// Splits every page into chunks and builds the TF-IDF vectors.
    pub fn build(filename: &str, pages: &[String], splitter: &TextSplitter) -> Self {
        let mut chunks = Vec::new();
        for (page_idx, page) in pages.iter().enumerate() {
            for text in splitter.split(page) {
                chunks.push(DocumentChunk {
                    text,
                    page_number: page_idx + 1,
                    chunk_index: chunks.len(),
                });
            }
        }

        let (token_to_idx, idf) = build_vocabulary(&chunks);
        let vectors = chunks
            .iter()
            .map(|c| tfidf_vector(&c.text, &token_to_idx, &idf))
            .collect();

        Self {
            filename: filename.to_string(),
            chunks,
            vectors,
            token_to_idx,
            idf,
            indexed_at: Utc::now(),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            filename: self.filename.clone(),
            chunks: self.chunks.len(),
            indexed_at: self.indexed_at,
        }
    }
}

impl Retriever for DocumentIndex {
    fn retrieve(&self, query: &str, k: usize) -> Vec<&DocumentChunk> {
        let query_vec = tfidf_vector(query, &self.token_to_idx, &self.idf);

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(&query_vec, v)))
            .collect();

        // Stable sort keeps document order among equal scores.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(i, _)| &self.chunks[i])
            .collect()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() >= MIN_TOKEN_LEN)
        .map(String::from)
        .collect()
}

fn build_vocabulary(chunks: &[DocumentChunk]) -> (HashMap<String, usize>, Vec<f32>) {
    let num_docs = chunks.len().max(1);

    let mut doc_freq: HashMap<String, usize> = HashMap::new();
    for chunk in chunks {
        let unique: HashSet<String> = tokenize(&chunk.text).into_iter().collect();
        for token in unique {
            *doc_freq.entry(token).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(String, usize)> = doc_freq.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut token_to_idx = HashMap::with_capacity(entries.len());
    let mut idf = Vec::with_capacity(entries.len());
    for (idx, (token, freq)) in entries.into_iter().enumerate() {
        token_to_idx.insert(token, idx);
        idf.push(((num_docs as f32) / (freq as f32)).ln() + 1.0);
    }

    (token_to_idx, idf)
}

/// L2-normalised TF-IDF vector; all zeros when no token is in the vocabulary.
fn tfidf_vector(text: &str, token_to_idx: &HashMap<String, usize>, idf: &[f32]) -> Vec<f32> {
    let mut vector = vec![0.0f32; idf.len()];
    let tokens = tokenize(text);
    let total = tokens.len().max(1) as f32;

    for token in &tokens {
        if let Some(&idx) = token_to_idx.get(token) {
            vector[idx] += 1.0 / total;
        }
    }
    for (v, w) in vector.iter_mut().zip(idf) {
        *v *= w;
    }

    let magnitude: f32 = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in &mut vector {
            *v /= magnitude;
        }
    }
    vector
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume_pages() -> Vec<String> {
        vec![
            "Jane Doe\nSenior engineer building distributed storage in Rust.".to_string(),
            "Led the migration of billing services to Kubernetes.".to_string(),
            "Hobbies: mountaineering and chess.".to_string(),
        ]
    }

    #[test]
    fn build_assigns_pages_and_positions() {
        let index = DocumentIndex::build("resume.pdf", &resume_pages(), &TextSplitter::default());
        let chunks = index.chunks();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].page_number, 2);
        assert_eq!(chunks[2].chunk_index, 2);
        assert_eq!(index.filename(), "resume.pdf");
    }

    #[test]
    fn retrieve_ranks_matching_chunk_first() {
        let index = DocumentIndex::build("resume.pdf", &resume_pages(), &TextSplitter::default());
        let hits = index.retrieve("Tell me about Kubernetes migration", 2);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].text.contains("Kubernetes"));
    }

    #[test]
    fn empty_query_returns_document_order() {
        let index = DocumentIndex::build("resume.pdf", &resume_pages(), &TextSplitter::default());
        let hits = index.retrieve("", 4);
        let positions: Vec<usize> = hits.iter().map(|c| c.chunk_index).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[test]
    fn retrieve_caps_at_k() {
        let index = DocumentIndex::build("resume.pdf", &resume_pages(), &TextSplitter::default());
        assert_eq!(index.retrieve("rust", 1).len(), 1);
        assert!(index.retrieve("rust", 0).is_empty());
    }

    #[test]
    fn tfidf_vector_is_normalised() {
        let index = DocumentIndex::build("resume.pdf", &resume_pages(), &TextSplitter::default());
        let v = tfidf_vector("rust storage", &index.token_to_idx, &index.idf);
        let mag: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((mag - 1.0).abs() < 1e-5);
    }

    #[test]
    fn tokenize_drops_short_tokens() {
        assert_eq!(tokenize("I am a Rust dev"), vec!["am", "rust", "dev"]);
    }
}
