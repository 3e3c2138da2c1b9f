//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier and visited set
//! - HTTP fetching behind the `Fetcher` trait
//! - Link resolution and content extraction
//! - The crawl engine that ties them together

mod engine;
mod extractor;
mod fetcher;
mod frontier;
mod resolver;
mod types;

pub use engine::{CrawlEngine, CrawlHandle};
pub use extractor::{
    clean_text, extract_title, extractor_for, ContentExtractor, ExtractedContent,
    FullTextExtractor, MarkdownExtractor,
};
pub use fetcher::{build_http_client, fetch_url, FetchedPage, Fetcher, HttpSession};
pub use frontier::{Frontier, FrontierEntry, VisitedSet};
pub use resolver::{resolve_links, DomainLinkResolver, LinkResolver};
pub use types::{CrawlConfig, PageRecord};
