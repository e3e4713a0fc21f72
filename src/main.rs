//! Web URL Scanner main entry point
//!
//! This is the command-line interface for the web URL scanner.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use web_url_scanner::config::{load_config, validate, Config};
use web_url_scanner::crawler::run_scan;
use web_url_scanner::input::read_seeds;

/// Web URL Scanner: a same-domain link crawler
///
/// Crawls every seed URL's site breadth-first, following only links that
/// stay on the seed's scheme, host and port, and records every reached and
/// every broken page in two CSV tables.
#[derive(Parser, Debug)]
#[command(name = "web-url-scanner")]
#[command(version)]
#[command(about = "A same-domain breadth-first link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed file with one URL per line
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory the outcome tables are written to
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Maximum link depth from each home page
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scanned without scanning
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_scan(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_url_scanner=info,warn"),
            1 => EnvFilter::new("web_url_scanner=debug,info"),
            2 => EnvFilter::new("web_url_scanner=trace,debug"),
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

/// Loads the config file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(input) = &cli.input {
        config.input.seeds_file = input.clone();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.output.data_dir = data_dir.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.scanner.max_depth = max_depth;
    }

    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be scanned
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Web URL Scanner Dry Run ===\n");

    println!("Scanner Configuration:");
    println!("  Max depth: {}", config.scanner.max_depth);
    println!("  Workers per session: {}", config.scanner.workers_per_session);
    println!("  Concurrent sessions: {}", config.scanner.concurrent_sessions);
    println!("  Seed wait: {}s", config.scanner.seed_wait_secs);

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Accept: {}", config.http.accept);
    println!("  Accept-Language: {}", config.http.accept_language);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Max redirects: {}", config.http.max_redirects);

    println!("\nOutput:");
    println!("  Reached table: {}", config.output.reached_path().display());
    println!("  Broken table: {}", config.output.broken_path().display());

    let seeds = read_seeds(&config.input.seeds_file)?;
    println!(
        "\nSeeds ({}) from {}:",
        seeds.len(),
        config.input.seeds_file.display()
    );
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start scanning with {} seed URLs", seeds.len());

    Ok(())
}

/// Handles the main scan operation
async fn handle_scan(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Writing reached URLs to {} and broken URLs to {}",
        config.output.reached_path().display(),
        config.output.broken_path().display()
    );

    match run_scan(config).await {
        Ok(summary) => {
            tracing::info!(
                "Scan completed successfully: {} sessions, {} pages fetched",
                summary.sessions,
                summary.pages_fetched
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scan failed: {}", e);
            Err(e.into())
        }
    }
}
