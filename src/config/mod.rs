//! Configuration module for Page-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use page_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, CrawlerConfig, ExtractionMode, HttpConfig, OutputConfig, OutputFormat,
    DEFAULT_USER_AGENT,
};

pub use parser::{compute_config_hash, load_config, parse_config};
pub use validation::{validate, validate_domain_string, validate_seed_url};
