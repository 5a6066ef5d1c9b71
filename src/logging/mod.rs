/*!
 * Logging Module
 * Centralized logging configuration and utilities
 */
pub mod config;
pub mod middleware;

use std::{io, path::Path};
use tracing_appender::{
    non_blocking,
    non_blocking::WorkerGuard,
    rolling::{InitError, RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

use self::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("cannot create log directory: {0}")]
    Directory(#[from] io::Error),

    #[error("cannot open log file: {0}")]
    Appender(#[from] InitError),

    #[error("cannot install subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

fn daily_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender, InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
}

/// Background writer guards. Dropping them flushes and stops the log threads.
#[must_use = "dropping the guards stops log output"]
pub struct LogGuards(#[allow(dead_code)] Vec<WorkerGuard>);

/// Initialize the logging system: console output plus daily-rolling
/// `app.<date>.log` files, and in production `error.<date>.log` holding
/// ERROR events only.
pub fn init(config: &LoggingConfig) -> Result<LogGuards, LoggingError> {
    std::fs::create_dir_all(&config.directory)?;

    let (file_writer, file_guard) = non_blocking(daily_appender(&config.directory, "app")?);
    let (console_writer, console_guard) = non_blocking(io::stdout());
    let mut guards = vec![file_guard, console_guard];

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format {
        LogFormat::Json => {
            let (error_writer, error_guard) =
                non_blocking(daily_appender(&config.directory, "error")?);
            guards.push(error_guard);

            let file_layer = fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            let error_layer = fmt::layer()
                .json()
                .with_writer(error_writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

            let console_layer = fmt::layer()
                .json()
                .with_writer(console_writer)
                .with_target(false);

            subscriber
                .with(file_layer)
                .with(error_layer)
                .with(console_layer)
                .try_init()?;
        }
        LogFormat::Pretty => {
            let file_layer = fmt::layer()
                .with_writer(file_writer)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false);

            let console_layer = fmt::layer()
                .with_writer(console_writer)
                .with_target(true)
                .pretty();

            subscriber.with(file_layer).with(console_layer).try_init()?;
        }
    }

    tracing::info!("Logging initialized for {} environment", config.environment);

    Ok(LogGuards(guards))
}
