//! PollReport - public opinion survey summary job
//!
//! A batch job that reads raw survey CSV files, aggregates support rates
//! overall and by demographic, and writes a timestamped text report.
//!
//! Exit codes:
//!   0 - Success (report written, location printed)
//!   1 - Argument or configuration error
//!   2 - Extract stage failed (no sources, unreadable source)
//!   3 - Transform stage failed (empty dataset, invalid outcome value)
//!   4 - Load stage failed (report could not be written)

mod analysis;
mod cli;
mod config;
mod error;
mod extract;
mod models;
mod pipeline;
mod report;
mod scanner;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use error::Stage;
use extract::Extractor;
use pipeline::Orchestrator;
use report::ReportWriter;
use scanner::ScanConfig;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("PollReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let extractor = Extractor::new(ScanConfig::from(&config.input));

    if args.dry_run {
        std::process::exit(handle_dry_run(&extractor));
    }

    let mut orchestrator = Orchestrator::new(
        extractor,
        ReportWriter::new(&config.report.output_dir),
        config.report.render_options(),
    );
    if !args.quiet {
        orchestrator = orchestrator.with_observer(print_stage);
    }

    match orchestrator.run() {
        Ok(location) => {
            println!("Pipeline completed. Report written to: {}", location.display());
        }
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Progress line for each stage the run enters.
fn print_stage(stage: Stage) {
    match stage {
        Stage::Extracting => println!("📥 Extracting survey sources..."),
        Stage::Transforming => println!("📊 Aggregating responses..."),
        Stage::Loading => println!("📝 Writing report..."),
        Stage::Done | Stage::Failed => {}
    }
}

/// Handle --init-config: generate a default .pollreport.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize input and output directories.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over `--verbose`/`--quiet` when set.
fn init_logging(args: &Args) {
    let level = args.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Handle --dry-run: list the sources, print them, exit.
fn handle_dry_run(extractor: &Extractor) -> i32 {
    println!("\n🔍 Dry run: discovering sources (no aggregation)...\n");

    match extractor.discover() {
        Ok(files) => {
            for file in &files {
                println!("     📄 {} ({} bytes)", file.path.display(), file.size);
            }
            println!("\n   Total: {} files", files.len());
            0
        }
        Err(e) => {
            eprintln!("\n❌ Error: {}", e);
            2
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = if let Some(ref config_path) = args.config {
        // An explicit config must load
        info!("Loading config from: {}", config_path.display());
        Config::load(config_path)?
    } else {
        match Config::load_default() {
            Ok(Some(config)) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {:#}", e);
                Config::default()
            }
        }
    };

    config.merge_with_args(args);
    Ok(config)
}
