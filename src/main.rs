//! Lexiscope main entry point

use anyhow::Context;
use clap::Parser;
use lexiscope::config::load_config_with_hash;
use lexiscope::crawler::crawl;
use lexiscope::stats::report::write_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Lexiscope: a polite, scope-restricted corpus crawler
///
/// Crawls a configured set of academic subdomains while respecting
/// robots.txt, collects word frequencies and per-subdomain page counts,
/// and writes a report when the frontier drains.
#[derive(Parser, Debug)]
#[command(name = "lexiscope")]
#[command(version)]
#[command(about = "A polite, scope-restricted corpus crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    tracing::info!(
        "Starting crawl: {} workers, {} seeds, agent {}",
        config.crawler.workers,
        config.seeds.len(),
        config.user_agent.agent_string()
    );

    let report_path = PathBuf::from(&config.report.path);
    let top_words = config.report.top_words;

    let snapshot = crawl(config).await.context("crawl failed")?;

    write_report(&snapshot, top_words, &report_path)
        .with_context(|| format!("failed writing report to {}", report_path.display()))?;

    println!(
        "Crawl complete: {} unique pages, report at {}",
        snapshot.total_unique_pages,
        report_path.display()
    );

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lexiscope=info,warn"),
            1 => EnvFilter::new("lexiscope=debug,info"),
            2 => EnvFilter::new("lexiscope=trace,debug"),
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

/// Prints what a run with this configuration would do
fn print_dry_run(config: &lexiscope::Config) {
    println!("=== Lexiscope Dry Run ===\n");

    println!("Crawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Delay between fetches: {}ms", config.crawler.time_delay_ms);
    println!("  Robots fetch timeout: {}s", config.crawler.robots_timeout_secs);

    println!("\nUser agent: {}", config.user_agent.agent_string());

    println!("\nScope:");
    println!("  Allowed domains: {:?}", config.scope.allowed_domains);
    println!("  Excluded hosts: {:?}", config.scope.excluded_hosts);
    println!("  Max query params: {}", config.scope.max_query_params);
    println!("  Date-path exclusion: {}", config.scope.exclude_dated_paths);
    println!(
        "  Denylisted extensions: {}",
        config.scope.extension_denylist.len()
    );
    println!("  Primary domain: {}", config.scope.primary_domain);

    println!("\nContent:");
    println!("  Minimum tokens: {}", config.content.min_tokens);
    println!("  Maximum bytes: {}", config.content.max_bytes);

    println!("\nReport: {} (top {} words)", config.report.path, config.report.top_words);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    if !config.sitemaps.is_empty() {
        println!("\nSitemaps ({}):", config.sitemaps.len());
        for sitemap in &config.sitemaps {
            println!("  - {}", sitemap);
        }
    }

    println!("\n✓ Configuration is valid");
}
