//! Image-Seine main entry point
//!
//! Command-line interface for the keyword image harvester.

use clap::Parser;
use image_seine::config::{load_config_or_default, read_keywords};
use image_seine::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Image-Seine: a keyword-driven image harvester
///
/// Crawls an image search engine for each keyword in the given list,
/// downloads candidate images, drops byte-identical duplicates across the
/// whole run, and records provenance metadata as CSV.
#[derive(Parser, Debug)]
#[command(name = "image-seine")]
#[command(version = "1.0.0")]
#[command(about = "A keyword-driven image harvester", long_about = None)]
struct Cli {
    /// Path to the keyword list (one keyword per line)
    #[arg(value_name = "KEYWORDS")]
    keywords: PathBuf,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and list the keywords without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let keywords = match read_keywords(&cli.keywords) {
        Ok(kw) => kw,
        Err(e) => {
            tracing::error!("Failed to load keywords: {}", e);
            return Err(e.into());
        }
    };
    tracing::info!("Loaded {} keywords from {}", keywords.len(), cli.keywords.display());

    if cli.dry_run {
        handle_dry_run(&config, &keywords);
        return Ok(());
    }

    match crawl(config.clone(), &keywords).await {
        Ok(summary) => {
            tracing::info!(
                "Run complete: {} keywords ({} aborted), {} images accepted, metadata in {}",
                summary.keywords,
                summary.keywords_aborted,
                summary.images_accepted,
                config.output.metadata_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("image_seine=info,warn"),
            1 => EnvFilter::new("image_seine=debug,info"),
            2 => EnvFilter::new("image_seine=trace,debug"),
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
fn handle_dry_run(config: &image_seine::config::Config, keywords: &[String]) {
    println!("=== Image-Seine Dry Run ===\n");

    println!("Crawl configuration:");
    println!("  Max images per keyword: {}", config.crawl.max_per_keyword);
    println!(
        "  Inter-page delay: {}-{} s",
        config.crawl.delay_min_secs, config.crawl.delay_max_secs
    );
    println!("  Request timeout: {} s", config.crawl.timeout_secs);

    println!("\nSearch endpoint:");
    println!("  {}", config.search.endpoint);

    println!("\nOutput:");
    println!("  Image root: {}", config.output.image_root);
    println!("  Metadata: {}", config.output.metadata_path);

    println!("\nKeywords ({}):", keywords.len());
    for keyword in keywords {
        println!("  - {}", keyword);
    }

    println!("\n✓ Configuration is valid");
}
