//! Value types passed into and out of a crawl

use crate::config::{validate_domain_string, validate_seed_url, Config};
use crate::url::normalize_parsed;
use crate::ConfigError;
use serde::Serialize;
use url::Url;

/// One crawled page, the unit of crawl output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// Normalized URL that was fetched
    pub url: String,

    /// Text of the `<title>` element, empty if absent
    pub title: String,

    /// Link distance from the seed
    pub depth: u32,

    /// Extracted page content
    pub text: String,
}

/// Parameters of a single crawl run
///
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    seed_url: Url,
    root_domain: String,
    max_depth: u32,
}

impl CrawlConfig {
    /// Creates a crawl configuration
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the seed URL is missing, relative or not
    /// HTTP(S), or if the root domain is missing or not a hostname.
    ///
    /// # Example
    ///
    /// ```
    /// use page_harvest::CrawlConfig;
    ///
    /// let config = CrawlConfig::new("https://admissions.example.edu/#top", "example.edu", 2).unwrap();
    /// assert_eq!(config.seed_url().as_str(), "https://admissions.example.edu/");
    /// assert!(CrawlConfig::new("", "example.edu", 2).is_err());
    /// ```
    pub fn new(seed_url: &str, root_domain: &str, max_depth: u32) -> Result<Self, ConfigError> {
        let seed = validate_seed_url(seed_url)?;
        let seed = normalize_parsed(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed_url, e)))?;

        let root_domain = root_domain.trim().to_lowercase();
        validate_domain_string(&root_domain)?;

        Ok(Self {
            seed_url: seed,
            root_domain,
            max_depth,
        })
    }

    /// Builds the crawl parameters from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let seed = config
            .crawler
            .seed_url
            .as_deref()
            .ok_or(ConfigError::Missing("crawler.seed-url"))?;
        let root = config
            .crawler
            .root_domain
            .as_deref()
            .ok_or(ConfigError::Missing("crawler.root-domain"))?;

        Self::new(seed, root, config.crawler.max_depth)
    }

    pub fn seed_url(&self) -> &Url {
        &self.seed_url
    }

    pub fn root_domain(&self) -> &str {
        &self.root_domain
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}
