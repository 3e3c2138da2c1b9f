use clap::ValueEnum;
use serde::Deserialize;

/// Browser-like user agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Page-Harvest
///
/// Every section is optional in the file; command-line flags fill in or
/// override values before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Absolute URL the crawl starts from
    #[serde(default)]
    pub seed_url: Option<String>,

    /// Domain the crawl is scoped to (compared by registrable domain)
    #[serde(default)]
    pub root_domain: Option<String>,

    /// Maximum link depth from the seed
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// How page content is turned into text
    #[serde(default)]
    pub extraction_mode: ExtractionMode,

    /// Number of fetches kept in flight
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Number of records buffered before the crawl waits on the consumer
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            root_domain: None,
            max_depth: default_max_depth(),
            extraction_mode: ExtractionMode::default(),
            workers: default_workers(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Content extraction strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMode {
    /// `<main>` (or `<body>`) converted to markdown-like text
    #[default]
    Markdown,
    /// Whole-page text with one block per line
    Text,
}

/// HTTP session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Accept invalid or self-signed TLS certificates.
    ///
    /// Off by default. Enabling it tolerates misconfigured servers at the
    /// cost of all certificate verification for the crawl.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            accept_invalid_certs: false,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory records are written to
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// On-disk record format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            format: OutputFormat::default(),
        }
    }
}

/// On-disk record format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Extracted text only
    #[default]
    Text,
    /// Full record serialized as JSON
    Json,
}

fn default_max_depth() -> u32 {
    2
}

fn default_workers() -> usize {
    1
}

fn default_channel_capacity() -> usize {
    16
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_output_directory() -> String {
    "./output".to_string()
}
