//! Driftnet main entry point
//!
//! Command-line interface for crawling a bounded web neighborhood and
//! querying the resulting keyword index.

use clap::Parser;
use driftnet::config::load_config_with_hash;
use driftnet::crawler::crawl;
use driftnet::search::search;
use driftnet::storage::{open_store, IndexStore};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Driftnet: a bounded web crawler with TF-IDF keyword search
///
/// Driftnet crawls from configured seed URLs, respecting robots.txt and a
/// politeness delay, indexes page text into a keyword store, and answers
/// free-text queries ranked by TF-IDF.
#[derive(Parser, Debug)]
#[command(name = "driftnet")]
#[command(version = "1.0.0")]
#[command(about = "A bounded web crawler with TF-IDF keyword search", long_about = None)]
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

    /// Query the existing index instead of crawling
    #[arg(long, value_name = "QUERY", conflicts_with_all = ["stats", "dry_run"])]
    search: Option<String>,

    /// Maximum number of search results
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: u32,

    /// Show index statistics and exit
    #[arg(long, conflicts_with_all = ["search", "dry_run"])]
    stats: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["search", "stats"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if let Some(query) = cli.search.as_deref() {
        handle_search(&config, query, cli.limit as usize)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("driftnet=info,warn"),
            1 => EnvFilter::new("driftnet=debug,info"),
            2 => EnvFilter::new("driftnet=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &driftnet::config::Config) {
    println!("=== Driftnet Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Politeness floor: {}ms",
        config.crawler.politeness_floor_ms
    );

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\nScope ({} allow-substrings):", config.scope.allow.len());
    for entry in &config.scope.allow {
        println!("  - {}", entry);
    }

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the index
fn handle_stats(config: &driftnet::config::Config) -> anyhow::Result<()> {
    let store = open_store(std::path::Path::new(&config.storage.database_path))?;
    let stats = store.stats()?;

    println!("Database: {}\n", config.storage.database_path);
    println!("Pages:    {}", stats.pages);
    println!("Keywords: {}", stats.keywords);
    println!("Postings: {}", stats.postings);

    Ok(())
}

/// Handles the --search mode: queries the existing index
fn handle_search(config: &driftnet::config::Config, query: &str, limit: usize) -> anyhow::Result<()> {
    let store = open_store(std::path::Path::new(&config.storage.database_path))?;
    let results = search(&store, query, limit)?;

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for (rank, hit) in results.iter().enumerate() {
        println!("{:2}. {} (score {:.4})", rank + 1, hit.title, hit.score);
        println!("    {}", hit.url);
        if !hit.description.is_empty() {
            println!("    {}", hit.description);
        }
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: driftnet::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, scope entries: {}",
        config.seeds.len(),
        config.scope.allow.len()
    );

    let report = crawl(config).await?;

    println!(
        "Crawl finished: {} pages visited, {} pages indexed",
        report.pages_visited, report.pages_indexed
    );

    Ok(())
}
