//! Модель данных шлюза.
//!
//! - `query`: аргументы query-триггера и проверенный запрос `Query`.
//! - `record`: запись upstream-источника (для ядра непрозрачна).
//! - `envelope`: конверт, публикуемый в шину.

pub mod envelope;
pub mod query;
pub mod record;

pub use envelope::*;
pub use query::*;
pub use record::*;
