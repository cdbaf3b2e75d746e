use serde::Deserialize;

/// Main configuration structure for Lexiscope
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub scope: ScopeConfig,
    pub content: ContentConfig,
    pub report: ReportConfig,

    /// Seed URLs the frontier starts from
    #[serde(default)]
    pub seeds: Vec<String>,

    /// XML sitemap URLs mined for additional seeds before the crawl starts
    #[serde(default)]
    pub sitemaps: Vec<String>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of parallel worker tasks
    pub workers: u32,

    /// Delay between fetches per worker (milliseconds)
    #[serde(rename = "time-delay-ms")]
    pub time_delay_ms: u64,

    /// Timeout for the one-time robots.txt fetch per host (seconds)
    #[serde(rename = "robots-timeout-secs", default = "default_robots_timeout")]
    pub robots_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the full user agent string: `Name/Version (+ContactURL; ContactEmail)`
    pub fn agent_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Scope and validity rules for discovered links
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// Allowed domain suffix patterns (e.g. "*.ics.uci.edu")
    #[serde(rename = "allowed-domains")]
    pub allowed_domains: Vec<String>,

    /// Hosts rejected even when they match an allowed pattern
    #[serde(rename = "excluded-hosts", default)]
    pub excluded_hosts: Vec<String>,

    /// Maximum number of distinct query-parameter keys
    #[serde(rename = "max-query-params", default = "default_max_query_params")]
    pub max_query_params: usize,

    /// Reject paths containing a recognizable date pattern (archive traps)
    #[serde(rename = "exclude-dated-paths", default)]
    pub exclude_dated_paths: bool,

    /// File extensions never worth fetching (binary / non-text formats)
    #[serde(rename = "extension-denylist", default = "default_extension_denylist")]
    pub extension_denylist: Vec<String>,

    /// Primary tracked domain for per-subdomain page statistics
    #[serde(rename = "primary-domain")]
    pub primary_domain: String,
}

/// Content acceptance thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Minimum filtered-token count for a page to be worth mining
    #[serde(rename = "min-tokens", default = "default_min_tokens")]
    pub min_tokens: usize,

    /// Maximum raw content size in bytes
    #[serde(rename = "max-bytes", default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Stop-word override; empty means the built-in English list
    #[serde(default)]
    pub stopwords: Vec<String>,
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Path the final report is written to
    pub path: String,

    /// How many of the highest-frequency words to include
    #[serde(rename = "top-words", default = "default_top_words")]
    pub top_words: usize,
}

fn default_robots_timeout() -> u64 {
    10
}

fn default_max_query_params() -> usize {
    5
}

fn default_min_tokens() -> usize {
    200
}

fn default_max_bytes() -> u64 {
    100_000_000
}

fn default_top_words() -> usize {
    50
}

/// Extensions of binary and non-text formats that are never crawled
fn default_extension_denylist() -> Vec<String> {
    [
        "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2",
        "mp3", "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf",
        "ps", "eps", "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data",
        "dat", "exe", "bz2", "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll",
        "cnf", "tgz", "sha1", "thmx", "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv",
        "swf", "wma", "zip", "rar", "gz",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
