//! Page-Harvest: a domain-scoped breadth-first site crawler
//!
//! This crate crawls a website from a seed URL, stays within the seed's
//! registrable domain, converts each page's main content to markdown-like
//! text and hands one record per page to an output sink.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Page-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
///
/// These are fatal: a crawl never starts with an invalid configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Failure to retrieve a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Failure to turn a fetched body into a document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported content type for {url}: {content_type}")]
    NotHtml { url: String, content_type: String },

    #[error("Empty document for {url}")]
    Empty { url: String },

    #[error("Invalid page URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Any failure isolated to one page of a crawl
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlConfig, CrawlEngine, PageRecord};
pub use crate::url::{normalize_url, registrable_domain, same_site};
