//! Coverage viewer backend.
//!
//! Reads location updates as JSON lines on stdin and writes a view model
//! as a JSON line on stdout every time the coverage changes.

use anyhow::anyhow;
use clap::Parser;
use log::info;
use svc_coverage::coverage::coverage_utils::loader::{DatasetSource, DATASET};
use svc_coverage::intake::{self, INTAKE_BUFFER};
use svc_coverage::*;
use tokio::sync::mpsc;

/// Command line overrides for the environment configuration.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Coverage GeoJSON file, plain or gzip compressed
    #[arg(long)]
    dataset: Option<String>,

    /// Proximity cutoff in kilometers
    #[arg(long)]
    radius_km: Option<f64>,

    /// Pretty print the view models
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Will use default config settings if no environment vars are found.
    let mut config = Config::try_from_env()
        .map_err(|e| anyhow!("Failed to load configuration from environment: {}", e))?;
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }
    if let Some(radius_km) = cli.radius_km {
        config.radius_km = radius_km;
    }

    // Try to load log configuration from the provided log file.
    // Will default to stderr debug logging if the file can not be loaded.
    if let Err(e) = load_logger_config_from_file(config.log_config.as_str()).await {
        log::error!("(main) {}", e);
    }

    info!("(main) Loaded config: {:?}", config);

    let dataset = DATASET
        .get_or_load(&DatasetSource::path(&config.dataset_path))
        .await;
    let mut session = CoverageSession::new(dataset, config.session_settings()?);

    let mut stdout = tokio::io::stdout();
    intake::write_view(&mut stdout, session.view(), cli.pretty).await?;

    let (tx, rx) = mpsc::channel(INTAKE_BUFFER);
    // A plain thread: a blocking stdin read must not hold up runtime shutdown.
    intake::spawn_reader(std::io::BufReader::new(std::io::stdin()), tx)?;

    let frames = intake::run_session(
        &mut session,
        rx,
        &mut stdout,
        cli.pretty,
        shutdown_signal("intake", None),
    )
    .await?;

    info!("(main) Session ended after {} view updates.", frames);

    // Make sure all log message are written/ displayed before shutdown
    log::logger().flush();

    Ok(())
}
