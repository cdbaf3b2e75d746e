//! Configuration module
//!
//! Loads, parses, and validates the TOML configuration that drives a crawl
//! run: worker counts, politeness settings, scope rules, content thresholds,
//! and report output.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    Config, ContentConfig, CrawlerConfig, ReportConfig, ScopeConfig, UserAgentConfig,
};
pub use validation::validate;
