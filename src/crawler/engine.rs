//! Crawl engine - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Managing the frontier queue and visited set
//! - Fetching pages through a `Fetcher`
//! - Extracting content and resolving links
//! - Handing finished records to the consumer over a bounded channel
//!
//! A failure on one page is logged and counted; it never ends the crawl.

use crate::config::{validate, Config};
use crate::crawler::extractor::{extractor_for, ContentExtractor};
use crate::crawler::fetcher::{FetchedPage, Fetcher, HttpSession};
use crate::crawler::frontier::{Frontier, FrontierEntry, VisitedSet};
use crate::crawler::resolver::{DomainLinkResolver, LinkResolver};
use crate::crawler::types::{CrawlConfig, PageRecord};
use crate::output::CrawlStats;
use crate::{FetchError, HarvestError, PageError, ParseError};
use futures::future::join_all;
use futures::Stream;
use scraper::Html;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use url::Url;

const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// Breadth-first, domain-scoped crawler
///
/// The engine is stateless between runs: every call to [`CrawlEngine::crawl`]
/// or [`CrawlEngine::run`] starts from a fresh frontier and visited set.
/// Cloning is cheap, components are shared behind `Arc`s.
#[derive(Clone)]
pub struct CrawlEngine {
    fetcher: Arc<dyn Fetcher>,
    resolver: Arc<dyn LinkResolver>,
    extractor: Arc<dyn ContentExtractor>,
    workers: usize,
    channel_capacity: usize,
}

impl CrawlEngine {
    /// Creates an engine from its three components
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        resolver: Arc<dyn LinkResolver>,
        extractor: Arc<dyn ContentExtractor>,
    ) -> Self {
        Self {
            fetcher,
            resolver,
            extractor,
            workers: 1,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Creates the production engine described by a configuration
    ///
    /// The configuration is validated first. Uses an `HttpSession` built
    /// from `[http]`, the domain link resolver and the extractor selected by
    /// `crawler.extraction-mode`.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        validate(config)?;
        let session = HttpSession::new(&config.http)?;

        Ok(Self::new(
            Arc::new(session),
            Arc::new(DomainLinkResolver),
            extractor_for(config.crawler.extraction_mode),
        )
        .with_workers(config.crawler.workers)
        .with_channel_capacity(config.crawler.channel_capacity))
    }

    /// Sets how many fetches may be in flight at once
    ///
    /// Entries are still dequeued and processed in frontier order, so the
    /// crawl stays breadth-first and each URL is fetched at most once.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Sets how many records may wait for the consumer before the crawl pauses
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Starts a crawl in the background
    ///
    /// Records arrive on the returned handle as pages are processed. Dropping
    /// the handle (or its receiver) stops the crawl.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use page_harvest::{CrawlConfig, CrawlEngine, Config};
    ///
    /// # async fn example(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    /// let engine = CrawlEngine::from_config(&config)?;
    /// let crawl = CrawlConfig::new("https://admissions.example.edu/", "example.edu", 2)?;
    ///
    /// let mut handle = engine.crawl(crawl);
    /// while let Some(record) = handle.next().await {
    ///     println!("{} (depth {})", record.url, record.depth);
    /// }
    /// let stats = handle.finish().await?;
    /// println!("{} pages", stats.pages_emitted);
    /// # Ok(())
    /// # }
    /// ```
    pub fn crawl(&self, config: CrawlConfig) -> CrawlHandle {
        let (sender, records) = mpsc::channel(self.channel_capacity);
        let engine = self.clone();

        let task = tokio::spawn(async move { engine.run(&config, sender).await });

        CrawlHandle { records, task }
    }

    /// Runs a crawl to completion, sending each record to `records`
    ///
    /// # Algorithm
    ///
    /// 1. Seed the frontier with `(seed, 0)`
    /// 2. Dequeue the oldest entries (up to `workers` of them), discarding
    ///    visited URLs and entries deeper than `max_depth`, marking the rest
    ///    visited
    /// 3. Fetch the batch concurrently
    /// 4. In dequeue order, for each page: parse, extract, resolve links,
    ///    enqueue them at `depth + 1`, send the record
    /// 5. Repeat until the frontier is empty or the receiver is gone
    ///
    /// The crawl ends as soon as the receiving side of `records` is closed,
    /// including while a batch is still being fetched.
    pub async fn run(&self, config: &CrawlConfig, records: mpsc::Sender<PageRecord>) -> CrawlStats {
        let started = Instant::now();
        let mut stats = CrawlStats::default();
        let mut frontier = Frontier::seeded(config.seed_url().as_str());
        let mut visited = VisitedSet::default();

        tracing::info!(
            seed = %config.seed_url(),
            root_domain = %config.root_domain(),
            max_depth = config.max_depth(),
            workers = self.workers,
            "Starting crawl"
        );

        'crawl: loop {
            if records.is_closed() {
                tracing::warn!("Record consumer closed, stopping crawl");
                break;
            }

            let batch =
                frontier.next_batch(&mut visited, config.max_depth(), self.workers, &mut stats);

            if batch.is_empty() {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            }

            let fetches = batch.iter().map(|entry| {
                tracing::debug!(url = %entry.url, depth = entry.depth, "Fetching");
                self.fetcher.fetch(&entry.url)
            });
            let results = tokio::select! {
                biased;
                _ = records.closed() => {
                    tracing::warn!("Record consumer closed, abandoning in-flight fetches");
                    break 'crawl;
                }
                results = join_all(fetches) => results,
            };

            for (entry, result) in batch.into_iter().zip(results) {
                let (record, links) = match self.process_page(&entry, result, config, &visited) {
                    Ok(processed) => processed,
                    Err(e) => {
                        stats.pages_failed += 1;
                        tracing::error!(url = %entry.url, depth = entry.depth, "Error crawling page: {}", e);
                        continue;
                    }
                };

                for link in links {
                    frontier.push(link, entry.depth + 1);
                    stats.links_enqueued += 1;
                }

                if records.send(record).await.is_err() {
                    tracing::warn!("Record consumer closed, stopping crawl");
                    break 'crawl;
                }
                stats.pages_emitted += 1;

                if stats.pages_emitted % 10 == 0 {
                    tracing::info!(
                        "Progress: {} pages crawled, {} failed, {} in frontier",
                        stats.pages_emitted,
                        stats.pages_failed,
                        frontier.len()
                    );
                }
            }
        }

        stats.elapsed = started.elapsed();
        tracing::info!(
            "Crawl finished: {} pages emitted, {} failed in {:?}",
            stats.pages_emitted,
            stats.pages_failed,
            stats.elapsed
        );

        stats
    }

    /// Turns one fetch result into a record and its follow-up links
    ///
    /// Synchronous on purpose: the parsed `Html` must not live across an
    /// await point.
    fn process_page(
        &self,
        entry: &FrontierEntry,
        fetched: Result<FetchedPage, FetchError>,
        config: &CrawlConfig,
        visited: &VisitedSet,
    ) -> Result<(PageRecord, Vec<String>), PageError> {
        let page = fetched?;

        if let Some(content_type) = page.content_type.as_deref() {
            if !is_html(content_type) {
                return Err(ParseError::NotHtml {
                    url: entry.url.clone(),
                    content_type: content_type.to_string(),
                }
                .into());
            }
        }

        if page.body.trim().is_empty() {
            return Err(ParseError::Empty {
                url: entry.url.clone(),
            }
            .into());
        }

        let base_url = Url::parse(&page.final_url).map_err(|e| ParseError::InvalidUrl {
            url: page.final_url.clone(),
            message: e.to_string(),
        })?;

        let document = Html::parse_document(&page.body);
        let content = self.extractor.extract(&document);
        let links = self
            .resolver
            .resolve_links(&base_url, config.root_domain(), &document, visited);

        tracing::info!(
            url = %entry.url,
            depth = entry.depth,
            links = links.len(),
            "Crawled page"
        );

        Ok((
            PageRecord {
                url: entry.url.clone(),
                title: content.title,
                depth: entry.depth,
                text: content.text,
            },
            links,
        ))
    }
}

/// Returns true for content types the extractor can parse
fn is_html(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// A crawl running in the background
///
/// Yields records in the order the crawl produces them.
pub struct CrawlHandle {
    records: mpsc::Receiver<PageRecord>,
    task: JoinHandle<CrawlStats>,
}

impl CrawlHandle {
    /// Waits for the next record, `None` once the crawl is over
    pub async fn next(&mut self) -> Option<PageRecord> {
        self.records.recv().await
    }

    /// Borrows the record sequence as a `Stream`
    pub fn stream(&mut self) -> impl Stream<Item = PageRecord> + '_ {
        futures::stream::poll_fn(move |cx| self.records.poll_recv(cx))
    }

    /// Stops receiving and waits for the crawl to end
    ///
    /// Any records not yet received are discarded. A crawl that is still
    /// running drops its in-flight fetches and stops without fetching more.
    pub async fn finish(self) -> Result<CrawlStats, JoinError> {
        drop(self.records);
        self.task.await
    }
}
