use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio_util::task::TaskTracker;
use tracing::{debug, info, info_span, warn, Instrument};

use super::{PublishOutcome, SourcePublisher};
use crate::{
    model::{Query, QueryArgs, Record},
    upstream::SourceEndpoint,
    QueryError,
};

/// Счётчики диспетчера. Только для логов и метрик, на корректность не
/// влияют.
#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Принятые запросы
    pub queries: AtomicU64,
    /// Отклонённые из-за формы запросы
    pub rejected: AtomicU64,
    /// Успешные публикации
    pub published: AtomicU64,
    /// Сбои источников
    pub failed: AtomicU64,
}

/// Снимок [`DispatchStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSnapshot {
    pub queries: u64,
    pub rejected: u64,
    pub published: u64,
    pub failed: u64,
    pub in_flight: usize,
}

/// Точка входа запроса.
///
/// Проверяет форму аргументов, запускает по одному [`SourcePublisher`] на
/// каждый зарегистрированный источник и сразу возвращает пустой результат.
/// Записи приходят позже и только через подписку с тем же идентификатором
/// корреляции.
///
/// Публикаторы работают по принципу fire-and-forget: их не ждут и не
/// отменяют. `TaskTracker` нужен только для счётчика задач в полёте и для
/// мягкой остановки.
pub struct Dispatcher {
    publisher: Arc<SourcePublisher>,
    endpoints: Arc<[SourceEndpoint]>,
    tracker: TaskTracker,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    pub fn new(
        publisher: SourcePublisher,
        endpoints: Vec<SourceEndpoint>,
    ) -> Self {
        Self {
            publisher: Arc::new(publisher),
            endpoints: endpoints.into(),
            tracker: TaskTracker::new(),
            stats: Arc::new(DispatchStats::default()),
        }
    }

    /// Обрабатывает запрос.
    ///
    /// Должен вызываться внутри рантайма Tokio. Ошибка возвращается для
    /// некорректной формы запроса и после [`Dispatcher::shutdown`]; в обоих
    /// случаях ни один публикатор не запускается.
    pub fn handle_query(
        &self,
        args: QueryArgs,
    ) -> Result<Vec<Record>, QueryError> {
        if self.tracker.is_closed() {
            self.stats.rejected.fetch_add(1, Ordering::Relaxed);
            return Err(QueryError::ShuttingDown);
        }

        let query = match Query::try_from(args) {
            Ok(query) => query,
            Err(err) => {
                self.stats.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(error = %err, "query rejected");
                return Err(err);
            }
        };

        self.stats.queries.fetch_add(1, Ordering::Relaxed);
        info!(
            correlation_id = %query.correlation_id(),
            latitude = query.latitude(),
            longitude = query.longitude(),
            radius_in_miles = query.radius_in_miles(),
            sources = self.endpoints.len(),
            "dispatching query"
        );

        for endpoint in self.endpoints.iter() {
            self.spawn_publisher(endpoint.clone(), query.clone());
        }

        Ok(Vec::new())
    }

    fn spawn_publisher(
        &self,
        endpoint: SourceEndpoint,
        query: Query,
    ) {
        let publisher = self.publisher.clone();
        let stats = self.stats.clone();
        let span = info_span!(
            "source_publisher",
            source = %endpoint.name(),
            correlation_id = %query.correlation_id()
        );

        self.tracker.spawn(
            async move {
                match publisher.run_and_publish(&endpoint, &query).await {
                    PublishOutcome::Published { .. } => {
                        stats.published.fetch_add(1, Ordering::Relaxed);
                    }
                    PublishOutcome::Failed => {
                        stats.failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
            .instrument(span),
        );
    }

    pub fn endpoints(&self) -> &[SourceEndpoint] {
        &self.endpoints
    }

    pub fn topic(&self) -> &Arc<str> {
        self.publisher.topic()
    }

    /// Количество публикаторов, ещё не завершившихся.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    pub fn stats(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            queries: self.stats.queries.load(Ordering::Relaxed),
            rejected: self.stats.rejected.load(Ordering::Relaxed),
            published: self.stats.published.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
        }
    }

    /// Перестаёт принимать запросы и ждёт публикаторов в полёте не дольше
    /// `grace`.
    ///
    /// Возвращает `true`, если все успели завершиться. Незавершённые задачи
    /// не отменяются.
    pub async fn shutdown(
        &self,
        grace: Duration,
    ) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending == 0 {
            return true;
        }

        info!(pending, grace_ms = grace.as_millis() as u64, "draining source publishers");
        match tokio::time::timeout(grace, self.tracker.wait()).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    pending = self.tracker.len(),
                    "source publishers still running after grace period"
                );
                false
            }
        }
    }
}
