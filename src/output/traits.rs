//! Output sink trait and error types
//!
//! A sink is the persistence collaborator of a crawl: it receives finished
//! `PageRecord`s and stores them. The crawl engine never depends on a sink
//! directly.

use crate::crawler::PageRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {key}: {source}")]
    Write {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to serialize record for {url}: {source}")]
    Serialize {
        url: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for record persistence backends
///
/// Writes are async so that file or network backends never block the
/// runtime the crawl is running on.
#[async_trait]
pub trait RecordSink: Send {
    /// Durably stores one record, returning the key it was stored under
    async fn write(&mut self, record: &PageRecord) -> OutputResult<String>;
}

/// In-memory sink, mostly useful for tests and library callers
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<PageRecord>,
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write(&mut self, record: &PageRecord) -> OutputResult<String> {
        self.records.push(record.clone());
        Ok(record.url.clone())
    }
}
