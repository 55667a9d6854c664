use std::fmt;

use num_enum::TryFromPrimitive;

/// Числовые коды ошибок шлюза, по тысяче на каждую подсистему:
///
/// - `1xxx` сам шлюз
/// - `2xxx` аргументы запроса
/// - `3xxx` upstream-источники
/// - `4xxx` шина событий
/// - `5xxx` конфигурация
///
/// Код уходит клиенту в поле `code` тела ошибки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === шлюз ===
    Internal = 1001,
    Unavailable = 1002,

    // === запрос ===
    MissingField = 2001,
    InvalidValue = 2002,
    InvalidData = 2003,

    // === upstream ===
    UpstreamUnreachable = 3001,
    UpstreamStatus = 3002,
    UpstreamDecode = 3003,

    // === шина ===
    TopicClosed = 4001,
    SubscriberLagged = 4002,
    NothingPending = 4003,

    // === конфигурация ===
    InvalidConfig = 5001,
}

impl StatusCode {
    pub const fn code(self) -> u32 {
        self as u32
    }

    pub fn from_u32(raw: u32) -> Option<Self> {
        Self::try_from(raw).ok()
    }

    /// Подсистема, к которой относится код (`"query"`, `"upstream"`, ...).
    pub const fn area(self) -> &'static str {
        match self.code() / 1000 {
            1 => "gateway",
            2 => "query",
            3 => "upstream",
            4 => "bus",
            _ => "config",
        }
    }

    /// Имеет ли смысл повторить операцию позже.
    ///
    /// Сам шлюз повторов не делает.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable
                | Self::UpstreamUnreachable
                | Self::UpstreamStatus
                | Self::SubscriberLagged
        )
    }

    /// Ошибка в самом запросе: повтор без исправления не поможет.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }

    /// Сбой на стороне шлюза или upstream.
    pub fn is_server_error(&self) -> bool {
        self.http_status() >= 500
    }

    /// HTTP-статус ответа для этого кода.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::MissingField | Self::InvalidValue | Self::InvalidData => 400,
            Self::NothingPending => 404,
            Self::SubscriberLagged => 409,
            Self::UpstreamUnreachable | Self::UpstreamStatus | Self::UpstreamDecode => 502,
            Self::Unavailable => 503,
            Self::Internal | Self::TopicClosed | Self::InvalidConfig => 500,
        }
    }
}

impl From<StatusCode> for u32 {
    fn from(status: StatusCode) -> Self {
        status.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{:?}({})", self.area(), self, self.code())
    }
}
