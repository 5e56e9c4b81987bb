use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates the TOML configuration at `path`
///
/// ```no_run
/// use std::path::Path;
/// use catalog_harvest::config::load_config;
///
/// let config = load_config(Path::new("crawl.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.max_concurrent_requests);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Hex-encoded SHA-256 of the configuration file
///
/// Stored on every crawl run so records can be traced back to the
/// configuration that produced them.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a configuration together with the hash of the exact bytes parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DiscountSignal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[user-agent]
crawler-name = "TestCrawler"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[site]
start-url = "https://shop.example.com/hoodies-c-181.html"
catalog-page-template = "https://shop.example.com/hoodies-c-181-page-{page}.html"
review-index-template = "https://shop.example.com/reviews-{product_id}.htm"
review-page-template = "https://shop.example.com/reviews-{product_id}-page-{page}.html"
"#;

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 2);
        assert_eq!(config.crawler.discount_signal, DiscountSignal::ListingPrice);
        assert_eq!(config.site.products_per_page, 120);
        assert_eq!(config.site.reviews_per_page, 6);
        assert_eq!(config.output.products_path, "results/products.csv");
        assert_eq!(config.output.delimiter, ",");
        assert!(config.output.database_path.is_none());
        assert!(config.render.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let config_content = format!(
            r#"
[crawler]
max-concurrent-requests = 4
request-timeout-secs = 10
max-retries = 0
retry-delay-ms = 250
discount-signal = "market-price"
{}
[render]
endpoint = "http://localhost:8050/render.html"
wait-secs = 3

[output]
products-path = "./out/p.csv"
reviews-path = "./out/r.csv"
delimiter = ";"
database-path = "./out/crawl.db"
"#,
            MINIMAL
        );

        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_concurrent_requests, 4);
        assert_eq!(config.crawler.max_retries, 0);
        assert_eq!(config.crawler.discount_signal, DiscountSignal::MarketPrice);
        assert_eq!(config.render.as_ref().map(|r| r.wait_secs), Some(3));
        assert_eq!(config.output.delimiter, ";");
        assert_eq!(config.output.database_path.as_deref(), Some("./out/crawl.db"));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_unknown_discount_signal() {
        let config_content = format!("[crawler]\ndiscount-signal = \"coupon\"\n{}", MINIMAL);
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = format!("[crawler]\nmax-concurrent-requests = 0\n{}", MINIMAL);
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_hash_matches_loaded_content() {
        let file = create_temp_config(MINIMAL);
        let (_, hash) = load_config_with_hash(file.path()).unwrap();
        assert_eq!(hash, compute_config_hash(file.path()).unwrap());
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
