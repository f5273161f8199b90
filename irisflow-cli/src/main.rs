//! Irisflow CLI — run the training pipeline or serve predictions.

use clap::Parser;
use irisflow_core::{Catalog, ConfigLoader};
use irisflow_ml::Pipeline;
use irisflow_serve::ServeContext;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Irisflow: a tracked tabular-ML pipeline with a serving API
#[derive(Parser, Debug)]
#[command(name = "irisflow", version, about, long_about = None)]
struct Cli {
    /// Directory holding the YAML configuration files
    #[arg(long, default_value = "configs")]
    config_dir: PathBuf,

    /// Root directory for catalog data and logs
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Execute the training pipeline inside one tracked run
    Run,
    /// Start the prediction API and model explorer
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = cli.data_dir.join("logs");
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "irisflow.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    tracing::debug!(
        config_dir = %cli.config_dir.display(),
        data_dir = %cli.data_dir.display(),
        "starting irisflow"
    );

    let loader = ConfigLoader::from_dir(&cli.config_dir);
    let catalog = build_catalog(&cli.config_dir, &cli.data_dir)?;

    match cli.command {
        Commands::Run => {
            let mut pipeline = Pipeline::new(loader, catalog);
            let report = pipeline.run()?;
            println!("Run {} finished", report.run_id);
            println!(
                "  rows: {} raw, {} after cleaning",
                report.rows_raw, report.rows_clean
            );
            println!("  training accuracy: {:.4}", report.train_accuracy);
        }
        Commands::Serve => {
            let config = loader.load()?;
            let context = ServeContext::load(&config, &catalog);
            if let Some(warning) = context.warning() {
                eprintln!("Warning: {warning}");
            }
            irisflow_serve::serve(context, &config.serving.host, config.serving.port).await?;
        }
    }

    Ok(())
}

/// Catalog from `catalog.yaml` when the config directory ships one,
/// otherwise the conventional layout under the data directory.
fn build_catalog(config_dir: &std::path::Path, data_dir: &std::path::Path) -> anyhow::Result<Catalog> {
    let definition = config_dir.join("catalog.yaml");
    if definition.is_file() {
        Ok(Catalog::from_config(&definition, data_dir)?)
    } else {
        Ok(Catalog::in_dir(data_dir))
    }
}
