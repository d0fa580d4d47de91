//! RosterLens - roster distribution reports for factory dashboards
//!
//! A CLI tool that fetches the personnel roster from the dashboard API,
//! applies role/status filters, and reports how the roster breaks down by
//! role, tenure and location.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (fetch failure, config, I/O, etc.)
//!   2 - No users matched the filters and --fail-on-empty was set

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod roster;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::RosterSnapshot;
use roster::{load_snapshot_file, or_sample_snapshot, sample_snapshot, RosterClient};
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed to write a config file
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("RosterLens v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .rosterlens.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the API URL, token, and default filters.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run the complete report workflow. Returns exit code (0 or 2).
async fn run_report(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let as_of = Utc::now().date_naive();

    // Step 1: Get the roster
    let snapshot = get_snapshot(&args, &config, as_of).await?;
    info!(
        "Roster has {} users from {}",
        snapshot.users.len(),
        snapshot.source
    );

    // Step 2: Filter and aggregate
    let report = report::build_report(&snapshot, &config.filters.role, &config.filters.status);

    // Step 3: Render
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, config.report.include_percentages)
        }
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            status(&args, &format!("\n✅ Report saved to: {}", path.display()));
        }
        None => println!("{}", output),
    }

    // Step 4: Optional CSV export of the filtered roster
    if let Some(ref csv_path) = args.csv {
        let filtered = analysis::filter(
            &snapshot.users,
            &config.filters.role,
            &config.filters.status,
        );
        report::write_csv(&filtered, csv_path)?;
        status(
            &args,
            &format!("📄 Exported {} rows to: {}", filtered.len(), csv_path.display()),
        );
    }

    let summary = &report.summary;
    status(&args, "\n📊 Roster Summary:");
    status(
        &args,
        &format!(
            "   Users: {} of {} | Roles: {} | Active: {} | Avg. experience: {} months",
            summary.total,
            report.metadata.records_total,
            summary.distinct_roles,
            summary.active_count,
            summary.avg_experience_months
        ),
    );

    if args.fail_on_empty && summary.total == 0 {
        eprintln!("\n⛔ No users matched the filters. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Print a progress line to stderr unless running quietly.
fn status(args: &Args, line: &str) {
    if !args.quiet {
        eprintln!("{}", line);
    }
}

/// Load the roster from the sample generator, a file, or the API.
async fn get_snapshot(args: &Args, config: &Config, as_of: NaiveDate) -> Result<RosterSnapshot> {
    let sample_count = config.fallback.sample_count;

    if args.sample {
        info!("Generating sample roster of {} users", sample_count);
        return Ok(sample_snapshot(sample_count, &mut rand::thread_rng(), as_of));
    }

    if let Some(ref input) = args.input {
        return load_snapshot_file(input, as_of)
            .with_context(|| format!("Failed to load roster from {}", input.display()));
    }

    status(
        args,
        &format!("📥 Fetching roster from: {}", config.api.base_url),
    );

    let client = RosterClient::new(config.api.clone())?;
    let spinner = fetch_spinner(args.quiet);
    let result = client.fetch_snapshot(as_of).await;
    spinner.finish_and_clear();

    let (snapshot, replaced) =
        or_sample_snapshot(result, &config.fallback, &mut rand::thread_rng(), as_of)
            .context("Failed to fetch roster")?;
    if let Some(e) = replaced {
        status(
            args,
            &format!(
                "⚠️  Could not load the roster ({}). Showing sample data instead.",
                e
            ),
        );
    }

    Ok(snapshot)
}

/// Spinner shown while the roster request is in flight.
fn fetch_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("   {spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("Waiting for the roster API...");
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
