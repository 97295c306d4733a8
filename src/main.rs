//! storage-uploader: simulated upload queue for the storage console
//!
//! Usage:
//!   storage-uploader [--config uploader.toml] [--log LEVEL] [PATH]...
//!   storage-uploader --headless PATH...
//!
//! Without `--headless` the upload panel opens with PATHs already queued.

use clap::Parser;
use eframe::egui;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use storage_uploader::app::StorageUploader;
use storage_uploader::config::UploaderConfig;
use storage_uploader::upload::{
    DriverSettings, FileProcessor, RandomIncrements, TracingNotifier, UploadQueue,
};
use storage_uploader::{Result, UploaderError};
use tokio::runtime::Runtime;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "storage-uploader",
    version,
    about = "Simulated upload queue for a cloud storage console"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(
        long,
        short = 'c',
        env = "STORAGE_UPLOADER_CONFIG",
        default_value = "uploader.toml"
    )]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, env = "STORAGE_UPLOADER_LOG")]
    log: Option<String>,

    /// Run the queue without a window and log each notification
    #[arg(long)]
    headless: bool,

    /// Files or folders to queue on start-up
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = UploaderConfig::load(&cli.config);

    let level = match (&cli.log, &config) {
        (Some(level), _) => level.clone(),
        (None, Ok(config)) => config.log_level.clone(),
        (None, Err(_)) => "info".to_string(),
    };
    init_logging(&level);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if !cli.config.exists() {
        warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

fn run(cli: Cli, config: UploaderConfig) -> Result<()> {
    let processor = FileProcessor::new(&config.ingest)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("upload-driver")
        .build()?;

    if cli.headless {
        return run_headless(&cli.paths, &config, &processor, runtime);
    }

    let files = processor.collect(&cli.paths);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([400.0, 500.0]),
        ..Default::default()
    };

    info!("starting upload panel");
    eframe::run_native(
        "Storage Uploader",
        options,
        Box::new(move |cc| {
            let mut app = StorageUploader::new(cc, &config, processor, runtime);
            app.add_files(files);
            Box::new(app)
        }),
    )
    .map_err(|e| UploaderError::Gui(e.to_string()))
}

fn run_headless(
    paths: &[PathBuf],
    config: &UploaderConfig,
    processor: &FileProcessor,
    runtime: Runtime,
) -> Result<()> {
    let files = processor.collect(paths);
    if files.is_empty() {
        warn!("nothing to upload");
        return Ok(());
    }

    let queue = UploadQueue::new(
        DriverSettings::from(&config.upload),
        Box::new(RandomIncrements::new(config.upload.max_increment)),
        Arc::new(TracingNotifier),
        runtime.handle().clone(),
    );
    queue.enqueue(files);
    queue.start_all();
    runtime.block_on(queue.settled());

    let summary = queue.summary();
    info!(
        "all uploads settled: {}/{} complete, {} failed",
        summary.complete,
        summary.total,
        summary.failed
    );
    Ok(())
}
