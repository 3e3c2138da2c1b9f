//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client (user agent, timeout, TLS policy)
//! - GET requests to fetch page content
//! - Error classification into `FetchError`
//!
//! Failures are never retried here; retry policy belongs to whoever wraps a
//! single fetch.

use crate::config::HttpConfig;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: String,

    /// HTTP status code (always 2xx)
    pub status_code: u16,

    /// Content-Type header value, if the server sent one
    pub content_type: Option<String>,

    /// Response body
    pub body: String,
}

/// Capability to retrieve a page
///
/// `HttpSession` is the production implementation; tests substitute
/// scripted fetchers.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning an error for network failures and non-2xx responses
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # TLS policy
///
/// Certificates are verified unless `accept_invalid_certs` is set. That
/// switch exists for sites with broken certificate chains and has to be
/// turned on explicitly in the config file or with `--insecure-tls`.
///
/// # Example
///
/// ```no_run
/// use page_harvest::config::HttpConfig;
/// use page_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true);

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for this crawl");
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build()
}

/// Production `Fetcher` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    /// Creates a session from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpSession {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `Ok(FetchedPage)` |
/// | Other status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection/TLS failure | `FetchError::Connect` |
/// | Anything else, including body read errors | `FetchError::Network` |
pub async fn fetch_url(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        content_type,
        body,
    })
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
