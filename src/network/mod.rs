//! HTTP/WebSocket-фасад шлюза.
//!
//! ## Подмодули
//!
//! - `server`: сборка `axum::Router`, общее состояние и сигнал остановки.
//! - `routes`: `POST /query` и `GET /health`.
//! - `ws`: `GET /subscriptions?correlationId=..`, поток конвертов в
//!   WebSocket.
//! - `error`: JSON-ответ `{code, error}` для ошибок клиента.
//!
//! Ядро (`dispatch`, `pubsub`) от этого модуля не зависит.

mod error;
mod routes;
pub mod server;
mod ws;

pub use error::ApiError;
pub use server::{router, shutdown_signal, AppState};
