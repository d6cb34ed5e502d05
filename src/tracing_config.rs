use std::env;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{Builder, Rotation},
};
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{ConfigPaths, GeneralConfig};

const DAYS_TO_KEEP: usize = 7;

/// Keeps the file sink flushing. Hold it until the process exits.
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Initialize tracing for the process.
///
/// `RUST_LOG` wins when set, otherwise `general.log_level` applies.
/// `CONNPANEL_LOG_FORMAT=json` switches stdout to JSON lines. With
/// `general.log_to_file` logs are also written to a daily rotated file in
/// the data directory.
///
/// # Errors
/// Returns error if the log directory cannot be created or a subscriber is
/// already installed.
pub fn init(general: &GeneralConfig) -> Result<LogGuard, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(general.log_level.directive()));
    let json = env::var("CONNPANEL_LOG_FORMAT").is_ok_and(|format| format == "json");

    let stdout = if json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stdout)
            .boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_writer(std::io::stdout)
            .boxed()
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![stdout];
    let mut guard = None;

    if general.log_to_file {
        let file_appender = Builder::new()
            .rotation(Rotation::DAILY)
            .max_log_files(DAYS_TO_KEEP)
            .filename_prefix("connpanel")
            .filename_suffix("log")
            .build(ConfigPaths::log_dir()?)?;
        let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
        guard = Some(worker);

        layers.push(
            fmt::layer()
                .compact()
                .with_target(true)
                .with_level(true)
                .with_writer(non_blocking)
                .with_ansi(false)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(LogGuard { _worker: guard })
}

/// Initialize quiet logging for one-shot CLI commands.
///
/// Only warnings and errors reach stderr unless `RUST_LOG` says otherwise.
///
/// # Errors
/// Returns error if a subscriber is already installed.
pub fn init_cli_mode() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    Ok(())
}
