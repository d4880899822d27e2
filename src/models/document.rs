// file: src/models/document.rs
// description: fetched page model with retrieval provenance
// reference: internal data structures

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalPath {
    Direct,
    Browser,
}

impl fmt::Display for RetrievalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalPath::Direct => write!(f, "direct"),
            RetrievalPath::Browser => write!(f, "browser"),
        }
    }
}

/// One fetched HTML page. Owned by the fetcher until handed to the
/// extractor; nothing here outlives the run.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub table_id: String,
    pub url: String,
    pub html: String,
    pub retrieved_via: RetrievalPath,
    pub fetched_at: DateTime<Utc>,
    pub content_hash: String,
}

impl RawDocument {
    pub fn new(table_id: String, url: String, html: String, retrieved_via: RetrievalPath) -> Self {
        Self::at(table_id, url, html, retrieved_via, Utc::now())
    }

    /// Timestamp-injecting constructor; the pipeline's only wall-clock
    /// dependent value lives here.
    pub fn at(
        table_id: String,
        url: String,
        html: String,
        retrieved_via: RetrievalPath,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let content_hash = Self::compute_hash(&html);
        Self {
            table_id,
            url,
            html,
            retrieved_via,
            fetched_at,
            content_hash,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
