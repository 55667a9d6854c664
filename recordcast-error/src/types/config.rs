use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки загрузки и проверки конфигурации.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Источники конфигурации не прочитаны или не десериализованы
    #[error("failed to load configuration: {reason}")]
    Load { reason: String },

    /// Некорректный URL upstream-источника
    #[error("invalid upstream url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Не задан ни один источник
    #[error("at least one record source must be configured")]
    NoSources,

    /// Имя источника повторяется
    #[error("record source '{name}' is configured twice")]
    DuplicateSource { name: String },

    /// Некорректное значение параметра
    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ErrorExt for ConfigError {
    fn status_code(&self) -> StatusCode {
        StatusCode::InvalidConfig
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
