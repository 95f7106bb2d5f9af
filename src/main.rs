//! levelq - durable FIFO queue
//!
//! Main entry point for the levelq CLI.

mod cli;
mod commands;

use std::io;

use clap::Parser;
use tracing::{error, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use levelq_config::{ConfigLoader, ConfigValidator, LoggingConfig};
use levelq_queue::PersistentQueue;

use crate::cli::Cli;

/// Initialize tracing with console output and an optional rolling log file.
///
/// Console output goes to stderr so command results on stdout stay clean.
fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let console = if config.json {
        fmt::layer().json().with_writer(io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed()
    };

    let (file, guard) = match &config.dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("levelq")
                .filename_suffix("log")
                .max_log_files(30)
                .build(log_dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(guard)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_or_default(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.queue.data_dir = data_dir;
    }

    // Keep the file writer alive until exit.
    let _guard = init_tracing(&config.logging)?;

    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    validation.into_result()?;

    let queue = PersistentQueue::open(&config.queue)?;

    let mut stdout = io::stdout().lock();
    if let Err(e) = commands::execute(&queue, &cli.command, &mut stdout) {
        error!("Command failed: {}", e);
        return Err(e);
    }

    // No-op after `drop`.
    queue.close()?;

    Ok(())
}
