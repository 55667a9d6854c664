use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    model::{Envelope, Query},
    pubsub::EventBus,
    upstream::{RecordSource, SourceEndpoint},
    ErrorExt,
};

/// Итог одного запуска публикатора.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Конверт опубликован
    Published { records: usize, receivers: usize },
    /// Источник не ответил; ничего не опубликовано
    Failed,
}

/// Мост между upstream-источником и шиной событий.
///
/// На каждый вызов — ровно 0 или 1 публикация. Сбой источника логируется
/// и поглощается здесь: ни диспетчер, ни подписчик его не видят.
pub struct SourcePublisher {
    source: Arc<dyn RecordSource>,
    bus: Arc<EventBus>,
    topic: Arc<str>,
}

impl SourcePublisher {
    pub fn new(
        source: Arc<dyn RecordSource>,
        bus: Arc<EventBus>,
        topic: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            source,
            bus,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &Arc<str> {
        &self.topic
    }

    /// Запрашивает источник и публикует результат под идентификатором
    /// корреляции запроса.
    pub async fn run_and_publish(
        &self,
        endpoint: &SourceEndpoint,
        query: &Query,
    ) -> PublishOutcome {
        let fetched = self
            .source
            .fetch_records(
                endpoint,
                query.latitude(),
                query.longitude(),
                query.radius_in_miles(),
            )
            .await;

        let records = match fetched {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    source = %endpoint.name(),
                    correlation_id = %query.correlation_id(),
                    status = %err.status_code(),
                    error = %err,
                    "upstream fetch failed, nothing published"
                );
                return PublishOutcome::Failed;
            }
        };

        let count = records.len();
        let envelope = Envelope::new(
            records,
            query.correlation_id().clone(),
            endpoint.name().clone(),
        );
        let receivers = self.bus.publish(&self.topic, envelope);

        debug!(
            source = %endpoint.name(),
            correlation_id = %query.correlation_id(),
            topic = %self.topic,
            records = count,
            receivers,
            "envelope published"
        );

        PublishOutcome::Published {
            records: count,
            receivers,
        }
    }
}
