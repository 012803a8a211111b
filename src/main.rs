mod config;
mod ingest;
mod location;
mod query;
mod store;
mod time_codec;
mod web;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{Config, StoreBackend};
use crate::ingest::Aggregator;
use crate::query::QueryService;
use crate::store::DeviceSummaryStore;

#[derive(Parser)]
#[command(name = "device-locator")]
#[command(about = "Device location cache and query API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and aggregate a sample file without touching the cache ("-" reads stdin)
    Validate { file: PathBuf },
    /// Rebuild device summaries in the cache from a sample file
    Ingest {
        #[arg(short, long)]
        config: Option<String>,
        /// Defaults to ingest.incoming_file or $INCOMING_FILE_PATH
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Ingest the configured sample file, if any, then serve the query API
    Serve {
        #[arg(short, long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => validate(&file),
        Commands::Ingest { config, file } => ingest_file(config.as_deref(), file).await,
        Commands::Serve { config } => serve(config.as_deref()).await,
    }
}

fn validate(path: &Path) -> ExitCode {
    let loaded = if path == Path::new("-") {
        ingest::read_samples(std::io::stdin().lock())
    } else {
        ingest::load_samples(path)
    };
    let samples = match loaded {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading samples: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match Aggregator::ingest(&samples) {
        Ok(summaries) => {
            println!(
                "Samples are valid ({} samples, {} devices)",
                samples.len(),
                summaries.len()
            );
            for (device_id, summary) in &summaries {
                println!(
                    "  device {}: {} points, {} .. {}",
                    device_id,
                    summary.trail.len(),
                    time_codec::format_display(&summary.started_at()),
                    time_codec::format_display(&summary.latest.timestamp)
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn ingest_file(config_path: Option<&str>, file: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path) {
        Some(c) => c,
        None => return ExitCode::FAILURE,
    };

    let Some(file) = file.or(config.ingest.incoming_file.clone()) else {
        eprintln!("No sample file given (use --file, ingest.incoming_file or $INCOMING_FILE_PATH)");
        return ExitCode::FAILURE;
    };

    if config.store.backend == StoreBackend::Memory {
        log::warn!("Ingesting into the memory store; results are discarded on exit");
    }

    let store = match store::open(&config.store).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if run_ingestion(&store, &file).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn serve(config_path: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Some(c) => c,
        None => return ExitCode::FAILURE,
    };

    let store = match store::open(&config.store).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error opening store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match &config.ingest.incoming_file {
        Some(file) => {
            if !run_ingestion(&store, file).await {
                return ExitCode::FAILURE;
            }
        }
        None => log::info!("No incoming file configured, serving existing cache contents"),
    }

    match web::run_server(&config.web, QueryService::new(store)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&str>) -> Option<Config> {
    match Config::load(path) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            None
        }
    }
}

async fn run_ingestion(store: &DeviceSummaryStore, file: &Path) -> bool {
    let samples = match ingest::load_samples(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading samples: {}", e);
            return false;
        }
    };

    match Aggregator::new(store.clone()).run(&samples).await {
        Ok(_) => true,
        Err(e) => {
            eprintln!("Ingestion aborted: {}", e);
            false
        }
    }
}
