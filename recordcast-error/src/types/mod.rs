pub mod config;
pub mod pubsub;
pub mod query;
pub mod upstream;

// Публичный экспорт всех типов ошибок из вложенных модулей, чтобы упростить
// доступ к ним из внешнего кода.
pub use config::*;
pub use pubsub::*;
pub use query::*;
pub use upstream::*;
