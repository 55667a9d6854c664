use std::any::Any;

use thiserror::Error;

use crate::{ErrorExt, StatusCode};

/// Ошибка ожидания следующего конверта из темы.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecvError {
    /// Тема закрыта: шина остановлена.
    #[error("topic closed")]
    Closed,

    /// Подписчик не успевал читать; самые старые конверты потеряны.
    #[error("subscriber fell behind, {0} envelopes dropped")]
    Lagged(u64),
}

/// Ошибка опроса темы без ожидания.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TryRecvError {
    /// Новых конвертов пока нет.
    #[error("no envelope pending")]
    Empty,

    #[error("topic closed")]
    Closed,

    #[error("subscriber fell behind, {0} envelopes dropped")]
    Lagged(u64),
}

impl ErrorExt for RecvError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Closed => StatusCode::TopicClosed,
            Self::Lagged(_) => StatusCode::SubscriberLagged,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "bus_recv".to_string()),
            ("status_code", self.status_code().code().to_string()),
        ];
        if let Self::Lagged(dropped) = self {
            tags.push(("dropped", dropped.to_string()));
        }
        tags
    }
}

impl ErrorExt for TryRecvError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Empty => StatusCode::NothingPending,
            Self::Closed => RecvError::Closed.status_code(),
            Self::Lagged(n) => RecvError::Lagged(*n).status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<RecvError> for TryRecvError {
    fn from(err: RecvError) -> Self {
        match err {
            RecvError::Closed => Self::Closed,
            RecvError::Lagged(n) => Self::Lagged(n),
        }
    }
}

#[cfg(feature = "tokio")]
mod tokio_conv {
    use tokio::sync::{broadcast::error as bc, mpsc::error as mc};

    use super::{RecvError, TryRecvError};

    impl From<bc::RecvError> for RecvError {
        fn from(err: bc::RecvError) -> Self {
            match err {
                bc::RecvError::Closed => Self::Closed,
                bc::RecvError::Lagged(n) => Self::Lagged(n),
            }
        }
    }

    impl From<bc::TryRecvError> for TryRecvError {
        fn from(err: bc::TryRecvError) -> Self {
            match err {
                bc::TryRecvError::Empty => Self::Empty,
                bc::TryRecvError::Closed => Self::Closed,
                bc::TryRecvError::Lagged(n) => Self::Lagged(n),
            }
        }
    }

    impl From<mc::TryRecvError> for TryRecvError {
        fn from(err: mc::TryRecvError) -> Self {
            match err {
                mc::TryRecvError::Empty => Self::Empty,
                mc::TryRecvError::Disconnected => Self::Closed,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что отставание попадает в теги с числом потерянных конвертов.
    #[test]
    fn test_lag_is_reported_with_count() {
        let err = RecvError::Lagged(7);
        assert_eq!(err.to_string(), "subscriber fell behind, 7 envelopes dropped");
        assert!(err
            .metrics_tags()
            .iter()
            .any(|(k, v)| *k == "dropped" && v == "7"));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_try_recv_shares_codes_with_recv() {
        assert_eq!(
            TryRecvError::from(RecvError::Closed).status_code(),
            StatusCode::TopicClosed
        );
        assert_eq!(TryRecvError::Lagged(1).status_code(), StatusCode::SubscriberLagged);
        assert_eq!(TryRecvError::Empty.status_code(), StatusCode::NothingPending);
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_from_tokio_errors() {
        use tokio::sync::{broadcast::error as bc, mpsc::error as mc};

        assert_eq!(RecvError::from(bc::RecvError::Lagged(3)), RecvError::Lagged(3));
        assert_eq!(TryRecvError::from(bc::TryRecvError::Empty), TryRecvError::Empty);
        assert_eq!(TryRecvError::from(bc::TryRecvError::Closed), TryRecvError::Closed);
        assert_eq!(TryRecvError::from(mc::TryRecvError::Empty), TryRecvError::Empty);
        assert_eq!(TryRecvError::from(mc::TryRecvError::Disconnected), TryRecvError::Closed);
    }
}
