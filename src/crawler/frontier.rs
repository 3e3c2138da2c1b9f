//! Crawl frontier and visited set
//!
//! The frontier is a plain FIFO queue: entries come out in the order they
//! were discovered, which is what makes the crawl breadth-first. The visited
//! set is marked when an entry is dequeued, never when it is discovered, so
//! a URL linked from many pages is still fetched at most once.

use crate::output::CrawlStats;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The normalized URL to fetch
    pub url: String,

    /// Link distance from the seed
    pub depth: u32,
}

/// FIFO queue of discovered, not yet fetched URLs
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn seeded(seed_url: &str) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed_url.to_string(), 0);
        frontier
    }

    /// Appends a URL to the back of the queue
    pub fn push(&mut self, url: String, depth: u32) {
        self.queue.push_back(FrontierEntry { url, depth });
    }

    /// Removes the oldest entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Dequeues the next entry that should be fetched
    ///
    /// Entries already visited or deeper than `max_depth` are discarded
    /// (and counted in `stats`). The returned entry is marked visited before
    /// it is handed out.
    pub fn pop_eligible(
        &mut self,
        visited: &mut VisitedSet,
        max_depth: u32,
        stats: &mut CrawlStats,
    ) -> Option<FrontierEntry> {
        while let Some(entry) = self.pop() {
            if visited.contains(&entry.url) {
                tracing::trace!(url = %entry.url, "Skipping already visited URL");
                stats.skipped_visited += 1;
                continue;
            }

            if entry.depth > max_depth {
                tracing::debug!(url = %entry.url, depth = entry.depth, "Skipping URL beyond max depth");
                stats.skipped_depth += 1;
                continue;
            }

            visited.mark(&entry.url);
            return Some(entry);
        }

        None
    }

    /// Dequeues up to `limit` eligible entries, oldest first
    pub fn next_batch(
        &mut self,
        visited: &mut VisitedSet,
        max_depth: u32,
        limit: usize,
        stats: &mut CrawlStats,
    ) -> Vec<FrontierEntry> {
        let mut batch = Vec::with_capacity(limit);
        while batch.len() < limit.max(1) {
            match self.pop_eligible(visited, max_depth, stats) {
                Some(entry) => batch.push(entry),
                None => break,
            }
        }
        batch
    }

    /// Returns the number of queued entries
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Set of normalized URLs that have been dequeued in this crawl
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    /// Returns true if the URL has already been dequeued
    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Marks a URL as visited, returning false if it already was
    pub fn mark(&mut self, url: &str) -> bool {
        if self.urls.contains(url) {
            return false;
        }
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for VisitedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            urls: iter.into_iter().map(Into::into).collect(),
        }
    }
}
