use std::sync::Arc;

use serde::Serialize;

use super::Record;

/// Конверт: пакет записей одного источника плюс идентификатор корреляции.
///
/// Создаётся ровно один раз на успешный вызов публикатора и после этого не
/// меняется. Записи и строки лежат за `Arc`, поэтому копия для каждого
/// подписчика не копирует сам пакет.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    records: Arc<[Record]>,
    correlation_id: Arc<str>,
    source: Arc<str>,
}

impl Envelope {
    pub fn new(
        records: Vec<Record>,
        correlation_id: Arc<str>,
        source: Arc<str>,
    ) -> Self {
        Self {
            records: records.into(),
            correlation_id,
            source,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Имя источника, от которого пришёл пакет.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Предикат фильтра подписки.
    #[inline]
    pub fn is_for(
        &self,
        correlation_id: &str,
    ) -> bool {
        *self.correlation_id == *correlation_id
    }
}
