use std::{any::Any, error::Error};

use crate::StatusCode;

/// Общий интерфейс ошибок шлюза.
///
/// Транспорт по нему строит ответ клиенту (`http_status`, `client_message`),
/// а логи и метрики получают код и теги. Трейт object-safe: ошибки можно
/// хранить как `&dyn ErrorExt`.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Код ошибки; по умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    fn as_any(&self) -> &dyn Any;

    /// HTTP-статус ответа клиенту.
    fn http_status(&self) -> u16 {
        self.status_code().http_status()
    }

    /// Имеет ли смысл повторить операцию.
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    /// Текст для клиента. Детали серверных сбоев без категории заменяются
    /// общим сообщением.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Internal => "internal gateway error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Полное описание для логов, вместе с цепочкой `source()`.
    fn log_message(&self) -> String {
        let mut message = self.to_string();
        let mut cause = self.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }
        message
    }

    /// Теги для метрик: тип, код и признак повторяемости.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![
            ("error_type", self.type_name()),
            ("status_code", self.status_code().code().to_string()),
            ("retryable", self.is_retryable().to_string()),
        ]
    }

    /// Имя типа без пути модуля.
    fn type_name(&self) -> String {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full).to_string()
    }
}
