use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибки обращения к upstream-источнику записей.
///
/// Не выходят за пределы публикатора источника: логируются и поглощаются.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Сетевой сбой (соединение, DNS, обрыв)
    #[error("transport failure for source '{name}': {reason}")]
    Transport { name: String, reason: String },

    /// Upstream ответил не-2xx статусом
    #[error("source '{name}' answered with HTTP {status}")]
    Status { name: String, status: u16 },

    /// Тело ответа не является JSON-массивом записей
    #[error("malformed payload from source '{name}': {reason}")]
    Decode { name: String, reason: String },
}

impl UpstreamError {
    /// Имя источника, на котором произошёл сбой.
    pub fn source_name(&self) -> &str {
        match self {
            Self::Transport { name, .. } | Self::Status { name, .. } | Self::Decode { name, .. } => {
                name
            }
        }
    }
}

impl ErrorExt for UpstreamError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Transport { .. } => StatusCode::UpstreamUnreachable,
            Self::Status { .. } => StatusCode::UpstreamStatus,
            Self::Decode { .. } => StatusCode::UpstreamDecode,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "upstream".to_string()),
            ("status_code", self.status_code().code().to_string()),
            ("source", self.source_name().to_string()),
        ];

        if let Self::Status { status, .. } = self {
            tags.push(("http_status", status.to_string()));
        }

        tags
    }
}
