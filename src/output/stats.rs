//! Crawl statistics
//!
//! Counters collected by the crawl engine during one run, plus the
//! summary printed by the command-line tool when the run ends.

use std::time::Duration;

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Records handed to the consumer
    pub pages_emitted: u64,

    /// Pages that failed to fetch or parse
    pub pages_failed: u64,

    /// Frontier entries dropped because the URL was already visited
    pub skipped_visited: u64,

    /// Frontier entries dropped because they were deeper than max depth
    pub skipped_depth: u64,

    /// Links pushed onto the frontier
    pub links_enqueued: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlStats {
    /// Number of fetch attempts made
    pub fn pages_attempted(&self) -> u64 {
        self.pages_emitted + self.pages_failed
    }

    /// Pages emitted per second of crawl time
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.pages_emitted as f64 / secs
        } else {
            0.0
        }
    }
}

/// Outcome of draining a crawl into a sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreSummary {
    pub stored: u64,
    pub failed: u64,
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats, store: &StoreSummary) {
    println!("=== Crawl Statistics ===\n");

    println!("Pages:");
    println!("  Attempted: {}", stats.pages_attempted());
    println!("  Emitted: {}", stats.pages_emitted);
    println!("  Failed: {}", stats.pages_failed);
    println!();

    println!("Frontier:");
    println!("  Links enqueued: {}", stats.links_enqueued);
    println!("  Skipped (already visited): {}", stats.skipped_visited);
    println!("  Skipped (beyond max depth): {}", stats.skipped_depth);
    println!();

    println!("Output:");
    println!("  Stored: {}", store.stored);
    println!("  Write failures: {}", store.failed);
    println!();

    let success_rate = if stats.pages_attempted() > 0 {
        (stats.pages_emitted as f64 / stats.pages_attempted() as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages) in {:.1}s ({:.2} pages/sec)",
        success_rate,
        stats.pages_emitted,
        stats.pages_attempted(),
        stats.elapsed.as_secs_f64(),
        stats.pages_per_second()
    );
}
