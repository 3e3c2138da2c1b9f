use crate::config::types::{Config, CrawlerConfig, HttpConfig, OutputConfig};
use crate::ConfigError;
use url::Url;

const MAX_WORKERS: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = config
        .seed_url
        .as_deref()
        .ok_or(ConfigError::Missing("crawler.seed-url"))?;
    validate_seed_url(seed)?;

    let root = config
        .root_domain
        .as_deref()
        .ok_or(ConfigError::Missing("crawler.root-domain"))?;
    validate_domain_string(root)?;

    if config.workers < 1 || config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, config.workers
        )));
    }

    if config.channel_capacity < 1 {
        return Err(ConfigError::Validation(
            "channel_capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP session configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Parses and checks a seed URL: absolute, HTTP(S), with a host
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    if seed.trim().is_empty() {
        return Err(ConfigError::Missing("crawler.seed-url"));
    }

    let url = Url::parse(seed.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            seed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' has no host",
            seed
        )));
    }

    Ok(url)
}

/// Validates a root domain string (a bare hostname, no scheme or path)
///
/// Single-label hosts such as `localhost` are accepted; they are their own
/// registrable domain.
pub fn validate_domain_string(domain: &str) -> Result<(), ConfigError> {
    if domain.trim().is_empty() {
        return Err(ConfigError::Missing("crawler.root-domain"));
    }

    // Check for invalid characters
    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' contains invalid characters",
            domain
        )));
    }

    // Check that it doesn't start or end with a dot or hyphen
    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot start or end with '.' or '-'",
            domain
        )));
    }

    // Check for consecutive dots
    if domain.contains("..") {
        return Err(ConfigError::InvalidDomain(format!(
            "Domain '{}' cannot contain consecutive dots",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.crawler.seed_url = Some("https://admissions.example.edu/".to_string());
        config.crawler.root_domain = Some("example.edu".to_string());
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_seed_url() {
        let mut config = valid_config();
        config.crawler.seed_url = None;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Missing("crawler.seed-url"))
        ));
    }

    #[test]
    fn test_missing_root_domain() {
        let mut config = valid_config();
        config.crawler.root_domain = None;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Missing("crawler.root-domain"))
        ));
    }

    #[test]
    fn test_workers_out_of_range() {
        let mut config = valid_config();
        config.crawler.workers = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));

        config.crawler.workers = 33;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = valid_config();
        config.http.timeout_secs = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validate_seed_url() {
        assert!(validate_seed_url("https://example.edu/").is_ok());
        assert!(validate_seed_url("http://127.0.0.1:8080/").is_ok());

        assert!(validate_seed_url("").is_err());
        assert!(validate_seed_url("example.edu/page").is_err());
        assert!(validate_seed_url("ftp://example.edu/").is_err());
        assert!(validate_seed_url("mailto:admin@example.edu").is_err());
    }

    #[test]
    fn test_validate_domain_string() {
        assert!(validate_domain_string("example.edu").is_ok());
        assert!(validate_domain_string("www.example.co.uk").is_ok());
        assert!(validate_domain_string("127.0.0.1").is_ok());
        assert!(validate_domain_string("localhost").is_ok());
        assert!(validate_domain_string("intranet").is_ok());

        assert!(validate_domain_string("").is_err());
        assert!(validate_domain_string(".example.edu").is_err());
        assert!(validate_domain_string("example.edu.").is_err());
        assert!(validate_domain_string("example..edu").is_err());
        assert!(validate_domain_string("https://example.edu").is_err());
    }
}
