use crate::config::types::{
    Config, ContentConfig, CrawlerConfig, ReportConfig, ScopeConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_scope_config(&config.scope)?;
    validate_content_config(&config.content)?;
    validate_report_config(&config.report)?;
    validate_seeds(&config.seeds)?;
    validate_sitemaps(&config.sitemaps)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 64 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 64, got {}",
            config.workers
        )));
    }

    if config.robots_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "robots-timeout-secs must be >= 1, got {}",
            config.robots_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler-name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates scope configuration
fn validate_scope_config(config: &ScopeConfig) -> Result<(), ConfigError> {
    if config.allowed_domains.is_empty() {
        return Err(ConfigError::Validation(
            "allowed-domains must contain at least one pattern".to_string(),
        ));
    }

    for pattern in &config.allowed_domains {
        validate_domain_pattern(pattern)?;
    }

    for host in &config.excluded_hosts {
        if host.is_empty() || host.contains('/') || host.contains('*') {
            return Err(ConfigError::Validation(format!(
                "excluded-hosts entries must be bare host names, got '{}'",
                host
            )));
        }
    }

    if config.primary_domain.is_empty() || config.primary_domain.starts_with("*.") {
        return Err(ConfigError::Validation(format!(
            "primary-domain must be a bare domain name, got '{}'",
            config.primary_domain
        )));
    }

    if config.max_query_params == 0 {
        return Err(ConfigError::Validation(
            "max-query-params must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates content thresholds
fn validate_content_config(config: &ContentConfig) -> Result<(), ConfigError> {
    if config.max_bytes == 0 {
        return Err(ConfigError::Validation(
            "max-bytes must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates report configuration
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "report path cannot be empty".to_string(),
        ));
    }

    if config.top_words == 0 {
        return Err(ConfigError::Validation(
            "top-words must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates seed URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use an HTTP(S) scheme",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates sitemap URLs; the list may be empty
fn validate_sitemaps(sitemaps: &[String]) -> Result<(), ConfigError> {
    for sitemap in sitemaps {
        let url = Url::parse(sitemap).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid sitemap URL '{}': {}", sitemap, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Sitemap URL '{}' must use an HTTP(S) scheme",
                sitemap
            )));
        }
    }

    Ok(())
}

/// Validates a domain pattern, optionally starting with "*."
fn validate_domain_pattern(pattern: &str) -> Result<(), ConfigError> {
    let base = pattern.strip_prefix("*.").unwrap_or(pattern);

    if base.is_empty() || !base.contains('.') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' is not a valid domain",
            pattern
        )));
    }

    if base.contains('*') || base.contains('/') || base.contains(' ') {
        return Err(ConfigError::InvalidPattern(format!(
            "Domain pattern '{}' may only use a leading '*.' wildcard",
            pattern
        )));
    }

    Ok(())
}

/// Basic email validation: one '@' with non-empty local and domain parts
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.'),
        None => false,
    };

    if !valid {
        return Err(ConfigError::Validation(format!(
            "contact-email '{}' is not a valid email address",
            email
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            crawler: CrawlerConfig {
                workers: 2,
                time_delay_ms: 500,
                robots_timeout_secs: 10,
            },
            user_agent: UserAgentConfig {
                crawler_name: "Lexiscope".to_string(),
                crawler_version: "0.1".to_string(),
                contact_url: "https://example.com/bot".to_string(),
                contact_email: "bot@example.com".to_string(),
            },
            scope: ScopeConfig {
                allowed_domains: vec!["*.ics.uci.edu".to_string()],
                excluded_hosts: vec![],
                max_query_params: 5,
                exclude_dated_paths: false,
                extension_denylist: vec!["pdf".to_string()],
                primary_domain: "ics.uci.edu".to_string(),
            },
            content: ContentConfig {
                min_tokens: 200,
                max_bytes: 100_000_000,
                stopwords: vec![],
            },
            report: ReportConfig {
                path: "./report.txt".to_string(),
                top_words: 50,
            },
            seeds: vec!["https://www.ics.uci.edu/".to_string()],
            sitemaps: vec![],
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = base_config();
        config.crawler.workers = 0;
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::Validation(_)
        ));
    }

    #[test]
    fn test_empty_allowed_domains_rejected() {
        let mut config = base_config();
        config.scope.allowed_domains.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_domain_pattern_rejected() {
        let mut config = base_config();
        config.scope.allowed_domains = vec!["*ics*".to_string()];
        assert!(matches!(
            validate(&config).unwrap_err(),
            ConfigError::InvalidPattern(_)
        ));
    }

    #[test]
    fn test_wildcard_primary_domain_rejected() {
        let mut config = base_config();
        config.scope.primary_domain = "*.ics.uci.edu".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_seed_scheme_rejected() {
        let mut config = base_config();
        config.seeds = vec!["ftp://www.ics.uci.edu/".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_seeds_rejected() {
        let mut config = base_config();
        config.seeds.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_sitemap_url_rejected() {
        let mut config = base_config();
        config.sitemaps = vec!["not a url".to_string()];
        assert!(validate(&config).is_err());

        config.sitemaps = vec!["ftp://ics.uci.edu/sitemap.xml".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_sitemaps_allowed() {
        let mut config = base_config();
        config.sitemaps.clear();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut config = base_config();
        config.user_agent.contact_email = "not-an-email".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_wildcard_excluded_host_rejected() {
        let mut config = base_config();
        config.scope.excluded_hosts = vec!["*.ics.uci.edu".to_string()];
        assert!(validate(&config).is_err());
    }
}
