use std::io;

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{layer::Layer, registry::LookupSpan};

use crate::logging::{config::LoggingConfig, formatter::build_formatter};

/// Консольный слой (stdout).
pub fn console_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    build_formatter(config, config.with_ansi, io::stdout)
}

/// Файловый слой с ежедневной ротацией и неблокирующей записью.
///
/// `WorkerGuard` должен жить до конца процесса, иначе хвост буфера теряется.
pub fn file_layer<S>(config: &LoggingConfig) -> (Box<dyn Layer<S> + Send + Sync>, WorkerGuard)
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let appender = rolling::daily(&config.log_dir, &config.file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    (build_formatter(config, false, writer), guard)
}
