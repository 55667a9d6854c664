use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки формы запроса.
///
/// Возвращаются синхронно вызывающему query-триггер, до запуска каких-либо
/// публикаторов.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Обязательное поле отсутствует
    #[error("missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Числовое поле не является конечным числом
    #[error("field '{field}' must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// Пустой идентификатор корреляции
    #[error("correlationId must not be blank")]
    BlankCorrelationId,

    /// Тело запроса не разобрано
    #[error("malformed query: {reason}")]
    Malformed { reason: String },

    /// Диспетчер останавливается и новых запросов не принимает
    #[error("gateway is shutting down")]
    ShuttingDown,
}

impl ErrorExt for QueryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingField { .. } => StatusCode::MissingField,
            Self::NonFinite { .. } | Self::BlankCorrelationId => StatusCode::InvalidValue,
            Self::Malformed { .. } => StatusCode::InvalidData,
            Self::ShuttingDown => StatusCode::Unavailable,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "query".to_string()),
            ("status_code", self.status_code().code().to_string()),
        ];

        match self {
            Self::MissingField { field } | Self::NonFinite { field, .. } => {
                tags.push(("field", field.to_string()));
            }
            _ => {}
        }

        tags
    }
}
