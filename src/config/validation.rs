use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RenderConfig, SiteConfig, UserAgentConfig,
};
use crate::url::{UrlTemplate, PAGE_PLACEHOLDER, PRODUCT_ID_PLACEHOLDER};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_site_config(&config.site)?;
    if let Some(render) = &config.render {
        validate_render_config(render)?;
    }
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 32, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates the seed URL, templates and page sizes
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let start = Url::parse(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start_url: {}", e)))?;

    if start.scheme() != "http" && start.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start_url '{}' must use HTTP or HTTPS",
            config.start_url
        )));
    }

    require_placeholders(
        "catalog_page_template",
        &config.catalog_page_template,
        &[PAGE_PLACEHOLDER],
    )?;
    require_placeholders(
        "review_index_template",
        &config.review_index_template,
        &[PRODUCT_ID_PLACEHOLDER],
    )?;
    require_placeholders(
        "review_page_template",
        &config.review_page_template,
        &[PRODUCT_ID_PLACEHOLDER, PAGE_PLACEHOLDER],
    )?;

    if config.products_per_page == 0 {
        return Err(ConfigError::Validation(
            "products_per_page must be greater than 0".to_string(),
        ));
    }

    if config.reviews_per_page == 0 {
        return Err(ConfigError::Validation(
            "reviews_per_page must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a template carries every placeholder it will be rendered with
fn require_placeholders(
    name: &str,
    template: &str,
    placeholders: &[&str],
) -> Result<(), ConfigError> {
    for placeholder in placeholders {
        if !template.contains(placeholder) {
            return Err(ConfigError::InvalidTemplate(format!(
                "{} must contain {}, got '{}'",
                name, placeholder, template
            )));
        }
    }

    UrlTemplate::new(template)?;
    Ok(())
}

fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid render endpoint: {}", e)))?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.products_path.is_empty() {
        return Err(ConfigError::Validation(
            "products_path cannot be empty".to_string(),
        ));
    }

    if config.reviews_path.is_empty() {
        return Err(ConfigError::Validation(
            "reviews_path cannot be empty".to_string(),
        ));
    }

    if config.delimiter.len() != 1 || !config.delimiter.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "delimiter must be a single ASCII character, got '{}'",
            config.delimiter
        )));
    }

    if matches!(&config.database_path, Some(path) if path.is_empty()) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    // Basic email format check: must contain @ and have text on both sides
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            start_url: "https://shop.example.com/hoodies-c-181.html".to_string(),
            catalog_page_template: "https://shop.example.com/hoodies-c-181-page-{page}.html"
                .to_string(),
            review_index_template: "https://shop.example.com/reviews-{product_id}.htm"
                .to_string(),
            review_page_template: "https://shop.example.com/reviews-{product_id}-page-{page}.html"
                .to_string(),
            products_per_page: 120,
            reviews_per_page: 6,
        }
    }

    #[test]
    fn test_validate_site_config() {
        assert!(validate_site_config(&site()).is_ok());
    }

    #[test]
    fn test_review_page_template_needs_both_placeholders() {
        let mut config = site();
        config.review_page_template = "https://shop.example.com/reviews-{page}.html".to_string();

        let result = validate_site_config(&config);
        assert!(matches!(result, Err(ConfigError::InvalidTemplate(_))));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = site();
        config.reviews_per_page = 0;
        assert!(validate_site_config(&config).is_err());
    }

    #[test]
    fn test_start_url_scheme() {
        let mut config = site();
        config.start_url = "ftp://shop.example.com/".to_string();
        assert!(validate_site_config(&config).is_err());
    }

    #[test]
    fn test_validate_delimiter() {
        let mut output = OutputConfig::default();
        assert!(validate_output_config(&output).is_ok());

        output.delimiter = ";;".to_string();
        assert!(validate_output_config(&output).is_err());

        output.delimiter = "\t".to_string();
        assert!(validate_output_config(&output).is_ok());
    }

    #[test]
    fn test_validate_concurrency_bounds() {
        let mut crawler = CrawlerConfig::default();
        assert!(validate_crawler_config(&crawler).is_ok());

        crawler.max_concurrent_requests = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_concurrent_requests = 33;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("admin@sub.example.com").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
