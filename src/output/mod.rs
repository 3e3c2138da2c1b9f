//! Output module for persisting crawl records
//!
//! This module handles:
//! - The `RecordSink` trait and its directory and in-memory backends
//! - Draining a running crawl into a sink
//! - Recording crawl statistics and printing them

mod directory;
pub mod stats;
mod traits;

pub use directory::{storage_key, DirectorySink};
pub use stats::{print_statistics, CrawlStats, StoreSummary};
pub use traits::{MemorySink, OutputError, OutputResult, RecordSink};

use crate::crawler::CrawlHandle;

/// Drains a crawl into a sink, one record at a time
///
/// A record that fails to store is logged and counted; the remaining
/// records are still stored.
pub async fn store_records<S: RecordSink>(handle: &mut CrawlHandle, sink: &mut S) -> StoreSummary {
    let mut summary = StoreSummary::default();

    while let Some(record) = handle.next().await {
        match sink.write(&record).await {
            Ok(key) => {
                summary.stored += 1;
                tracing::debug!(url = %record.url, key = %key, "Record stored");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::error!(url = %record.url, "Failed to store record: {}", e);
            }
        }
    }

    summary
}
