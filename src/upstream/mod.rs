//! Клиент upstream-источников записей.
//!
//! Каждый источник — непрозрачный HTTP-эндпоинт, отдающий JSON-массив
//! записей. Доступ к нему скрыт за трейтом [`RecordSource`], чтобы
//! диспетчер не зависел от транспорта.

pub mod endpoint;
pub mod http;

use async_trait::async_trait;

pub use endpoint::SourceEndpoint;
pub use http::HttpRecordSource;

use crate::{model::Record, UpstreamError};

/// Источник записей в радиусе от точки.
///
/// Реализация не повторяет запросы и не ограничивает их по времени; любой
/// сбой возвращается как [`UpstreamError`] и никогда не паникует.
#[async_trait]
pub trait RecordSource: Send + Sync + 'static {
    async fn fetch_records(
        &self,
        endpoint: &SourceEndpoint,
        latitude: f64,
        longitude: f64,
        radius_in_miles: f64,
    ) -> Result<Vec<Record>, UpstreamError>;
}
