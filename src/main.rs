//! Page-Harvest main entry point
//!
//! This is the command-line interface for the Page-Harvest site crawler.

use anyhow::Context;
use clap::Parser;
use page_harvest::config::{
    compute_config_hash, parse_config, validate, Config, ExtractionMode, OutputFormat,
};
use page_harvest::output::{print_statistics, store_records, DirectorySink};
use page_harvest::{CrawlConfig, CrawlEngine};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Harvest: a domain-scoped site crawler
///
/// Page-Harvest crawls a website breadth-first from a seed URL, never
/// leaving the seed's registrable domain, and stores the main content of
/// every page it reaches as markdown-like text.
#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A domain-scoped site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL the crawl starts from
    #[arg(long)]
    seed: Option<String>,

    /// Domain the crawl stays within
    #[arg(long)]
    root_domain: Option<String>,

    /// Maximum link depth from the seed
    #[arg(long)]
    max_depth: Option<u32>,

    /// How page content is extracted
    #[arg(long, value_enum)]
    mode: Option<ExtractionMode>,

    /// Number of fetches kept in flight
    #[arg(long)]
    workers: Option<usize>,

    /// Directory records are written to
    #[arg(short, long)]
    output: Option<String>,

    /// On-disk record format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Accept invalid TLS certificates
    #[arg(long)]
    insecure_tls: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line flags on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(seed) = &self.seed {
            config.crawler.seed_url = Some(seed.clone());
        }
        if let Some(root) = &self.root_domain {
            config.crawler.root_domain = Some(root.clone());
        }
        if let Some(depth) = self.max_depth {
            config.crawler.max_depth = depth;
        }
        if let Some(mode) = self.mode {
            config.crawler.extraction_mode = mode;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(directory) = &self.output {
            config.output.directory = directory.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.insecure_tls {
            config.http.accept_invalid_certs = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let config = parse_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            let hash = compute_config_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    validate(&config).context("Invalid configuration")?;

    let crawl = CrawlConfig::from_config(&config)?;

    if cli.dry_run {
        handle_dry_run(&config, &crawl);
        return Ok(());
    }

    handle_crawl(&config, crawl).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvest=info,warn"),
            1 => EnvFilter::new("page_harvest=debug,info"),
            2 => EnvFilter::new("page_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, crawl: &CrawlConfig) {
    println!("=== Page-Harvest Dry Run ===\n");

    println!("Crawl:");
    println!("  Seed: {}", crawl.seed_url());
    println!("  Root domain: {}", crawl.root_domain());
    println!("  Max depth: {}", crawl.max_depth());
    println!("  Extraction mode: {:?}", config.crawler.extraction_mode);
    println!("  Workers: {}", config.crawler.workers);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!(
        "  TLS verification: {}",
        if config.http.accept_invalid_certs {
            "disabled"
        } else {
            "enabled"
        }
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Format: {:?}", config.output.format);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, crawl: CrawlConfig) -> anyhow::Result<()> {
    let engine = CrawlEngine::from_config(config).context("Failed to build crawl engine")?;
    let mut sink = DirectorySink::from_config(&config.output).with_context(|| {
        format!(
            "Failed to prepare output directory {}",
            config.output.directory
        )
    })?;

    let mut handle = engine.crawl(crawl);
    let summary = store_records(&mut handle, &mut sink).await;
    let stats = handle.finish().await.context("Crawl task failed")?;

    tracing::info!(
        "Crawl completed: {} records stored in {}",
        summary.stored,
        sink.directory().display()
    );
    print_statistics(&stats, &summary);

    Ok(())
}
