use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "todo_graphql=info";

/// Initializes console logging plus, when enabled, a daily-rolling JSON log file.
///
/// The returned guard flushes the file writer on drop, so keep it alive for the
/// lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let (file_layer, guard) = if config.file {
        match fs::create_dir_all(&config.directory) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
                let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
                (Some(fmt::layer().json().with_writer(non_blocking_writer)), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Could not create log directory {}: {}; logging to console only",
                    config.directory.display(),
                    e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    guard
}
