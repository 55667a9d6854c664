pub mod config;
mod filters;
mod formatter;
pub mod handle;
mod sinks;

pub use self::config::{LogFormat, LoggingConfig};
pub use filters::build_filter_from_config;
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Инициализация глобального subscriber'а по конфигурации.
///
/// Повторный вызов возвращает ошибку, а не паникует.
pub fn init_logging(
    config: &LoggingConfig
) -> Result<LoggingHandle, Box<dyn std::error::Error + Send + Sync>> {
    config.validate()?;
    config.ensure_log_dir()?;

    let env_filter = filters::build_filter_from_config(config);
    let mut layers = Vec::new();

    if config.console_enabled {
        layers.push(sinks::console_layer(config));
    }

    let file_guard = if config.file_enabled {
        let (file_layer, guard) = sinks::file_layer(config);
        layers.push(file_layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_level = %config.level,
        log_dir = %config.log_dir.display(),
        console_enabled = config.console_enabled,
        file_enabled = config.file_enabled,
        "Logging system initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
