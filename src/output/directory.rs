//! Filesystem record sink
//!
//! Each record becomes one file named after a hash of its URL, so any URL
//! (query strings, unicode paths, very long paths) maps to a path-safe,
//! fixed-length name and re-crawls overwrite earlier copies of a page.

use crate::config::{OutputConfig, OutputFormat};
use crate::crawler::PageRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Derives the storage key of a URL (hex SHA-256)
///
/// # Example
///
/// ```
/// use page_harvest::output::storage_key;
///
/// let key = storage_key("https://example.edu/");
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, storage_key("https://example.edu/"));
/// ```
pub fn storage_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// JSON document written for each record
#[derive(Debug, Serialize)]
struct StoredRecord<'a> {
    #[serde(flatten)]
    record: &'a PageRecord,
    stored_at: DateTime<Utc>,
}

/// Writes records into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    format: OutputFormat,
}

impl DirectorySink {
    /// Creates the sink, creating the directory if needed
    pub fn new(directory: impl Into<PathBuf>, format: OutputFormat) -> OutputResult<Self> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)?;
        Ok(Self { directory, format })
    }

    /// Creates the sink described by the output configuration
    pub fn from_config(config: &OutputConfig) -> OutputResult<Self> {
        Self::new(&config.directory, config.format)
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the file a record with this URL is written to
    pub fn path_for(&self, url: &str) -> PathBuf {
        let extension = match self.format {
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        };
        self.directory
            .join(format!("{}.{}", storage_key(url), extension))
    }

    fn render(&self, record: &PageRecord) -> OutputResult<String> {
        match self.format {
            OutputFormat::Text => Ok(record.text.clone()),
            OutputFormat::Json => {
                let stored = StoredRecord {
                    record,
                    stored_at: Utc::now(),
                };
                serde_json::to_string_pretty(&stored).map_err(|source| OutputError::Serialize {
                    url: record.url.clone(),
                    source,
                })
            }
        }
    }
}

#[async_trait]
impl RecordSink for DirectorySink {
    async fn write(&mut self, record: &PageRecord) -> OutputResult<String> {
        let path = self.path_for(&record.url);
        let contents = self.render(record)?;
        let key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| OutputError::Write {
                key: key.clone(),
                source,
            })?;

        tracing::debug!(url = %record.url, key = %key, "Stored page record");
        Ok(key)
    }
}
