//! Fan-out запроса по источникам.
//!
//! - `publisher`: мост «один источник → шина» ([`SourcePublisher`]).
//! - `dispatcher`: точка входа запроса ([`Dispatcher`]); запускает по
//!   публикатору на источник и сразу возвращает пустой результат.

pub mod dispatcher;
pub mod publisher;

pub use dispatcher::*;
pub use publisher::*;
