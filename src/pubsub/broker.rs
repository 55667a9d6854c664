use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, trace};

use super::{FilteredSubscription, Subscription};
use crate::model::Envelope;

type TopicKey = Arc<str>;

/// Тема по умолчанию, на которой публикуются все конверты.
pub const RECORDS_IN_RADIUS: &str = "RECORDS_IN_RADIUS";

/// Подписчики одной темы.
///
/// Сырые подписки читают общий кольцевой буфер `broadcast`. Отфильтрованные
/// подписки лежат в таблице маршрутов по идентификатору корреляции: каждая
/// имеет свою очередь, и в неё попадают только её конверты.
struct Topic {
    raw: broadcast::Sender<Envelope>,
    routes: HashMap<Arc<str>, Vec<mpsc::UnboundedSender<Envelope>>>,
}

impl Topic {
    fn new(capacity: usize) -> Self {
        Self {
            raw: broadcast::channel(capacity).0,
            routes: HashMap::new(),
        }
    }

    /// Живые подписчики: сырые приёмники плюс неотменённые маршруты.
    fn live(&self) -> usize {
        let routed = self
            .routes
            .values()
            .flatten()
            .filter(|tx| !tx.is_closed())
            .count();
        self.raw.receiver_count() + routed
    }

    /// Убирает маршруты, чьи подписки уже отброшены.
    fn prune_routes(&mut self) {
        self.routes.retain(|_, senders| {
            senders.retain(|tx| !tx.is_closed());
            !senders.is_empty()
        });
    }
}

/// Шина событий: мультиплексор publish/subscribe с ключом по теме.
///
/// Поддерживает:
/// - Fan-out: каждый конверт получает каждый подписчик, живой на момент
///   публикации
/// - Порядок публикации внутри темы для каждого подписчика
/// - Отсутствие буфера и повтора: поздний подписчик ничего не получает
///   задним числом
/// - Маршрутизацию по идентификатору корреляции при публикации: чужой
///   поток не занимает место в очереди подписчика
/// - Автоматическое удаление тем без подписчиков
/// - Явный жизненный цикл: [`EventBus::shutdown`] закрывает все темы
///
/// Реестр тем — `DashMap`, поэтому subscribe/publish/удаление темы
/// сериализуются по шардам и безопасны из нескольких потоков.
pub struct EventBus {
    topics: DashMap<TopicKey, Topic>,
    /// Ёмкость кольцевого буфера сырых подписок темы
    capacity: usize,
    closed: AtomicBool,
    /// Общее количество вызовов `publish`
    pub publish_count: AtomicUsize,
    /// Публикации, не дошедшие ни до одного подписчика
    pub dropped_count: AtomicUsize,
}

impl EventBus {
    /// Создаёт шину.
    ///
    /// `capacity` ограничивает только сырые подписки: отставший больше чем
    /// на `capacity` конвертов сырой подписчик теряет самые старые из них.
    /// Отфильтрованные подписки ничего не теряют. Публикатор не блокируется
    /// ни в одном из случаев.
    pub fn new(capacity: usize) -> Self {
        Self {
            topics: DashMap::new(),
            capacity: capacity.max(1),
            closed: AtomicBool::new(false),
            publish_count: AtomicUsize::new(0),
            dropped_count: AtomicUsize::new(0),
        }
    }

    /// Подписка на все конверты темы (точное совпадение имени).
    ///
    /// Поток бесконечен: он завершается только отпиской (drop) или
    /// остановкой шины. После [`EventBus::shutdown`] возвращается уже
    /// закрытая подписка.
    pub fn subscribe(
        &self,
        topic: &str,
    ) -> Subscription {
        let key: TopicKey = Arc::from(topic);
        let rx = self
            .register(&key, |topic| topic.raw.subscribe())
            .unwrap_or_else(|| broadcast::channel(1).1);

        trace!(topic = %key, "subscribed");
        Subscription::new(key, rx)
    }

    /// Подписка на тему, сужённая до одного идентификатора корреляции.
    ///
    /// Конверты с другим идентификатором до подписки не доходят вовсе.
    pub fn subscribe_filtered(
        &self,
        topic: &str,
        correlation_id: impl Into<Arc<str>>,
    ) -> FilteredSubscription {
        let key: TopicKey = Arc::from(topic);
        let correlation_id: Arc<str> = correlation_id.into();
        let (tx, rx) = mpsc::unbounded_channel();

        // При закрытой шине `tx` уходит вместе с замыканием, и подписка
        // сразу закрыта.
        let route = correlation_id.clone();
        self.register(&key, move |topic| {
            topic.prune_routes();
            topic.routes.entry(route).or_default().push(tx);
        });

        trace!(topic = %key, correlation_id = %correlation_id, "subscribed filtered");
        FilteredSubscription::new(key, correlation_id, rx)
    }

    /// Регистрирует подписчика в теме, создавая её при необходимости.
    ///
    /// Флаг остановки проверяется под блокировкой шарда: `shutdown`
    /// выставляет флаг до `clear`, поэтому запись либо не создаётся, либо
    /// удаляется вместе с остальными.
    fn register<R>(
        &self,
        key: &TopicKey,
        attach: impl FnOnce(&mut Topic) -> R,
    ) -> Option<R> {
        let entry = self.topics.entry(key.clone());
        if self.is_closed() {
            return None;
        }
        let mut topic = entry.or_insert_with(|| Topic::new(self.capacity));
        Some(attach(topic.value_mut()))
    }

    /// Публикация конверта в тему.
    ///
    /// Возвращает количество подписчиков, получивших конверт: все сырые
    /// плюс отфильтрованные с тем же идентификатором корреляции. Если никто
    /// не получил, увеличивает `dropped_count`, а опустевшую тему удаляет.
    pub fn publish(
        &self,
        topic: &str,
        envelope: Envelope,
    ) -> usize {
        self.publish_count.fetch_add(1, Ordering::Relaxed);

        let (delivered, stale) = match self.topics.get(topic) {
            Some(entry) => {
                let raw = entry.raw.send(envelope.clone()).unwrap_or(0);
                let mut routed = 0;
                let mut stale = false;
                for tx in entry.routes.get(envelope.correlation_id()).into_iter().flatten() {
                    match tx.send(envelope.clone()) {
                        Ok(()) => routed += 1,
                        Err(_) => stale = true,
                    }
                }
                (raw + routed, stale)
            }
            None => {
                self.dropped_count.fetch_add(1, Ordering::Relaxed);
                trace!(topic, "publish to topic without subscribers");
                return 0;
            }
        };

        if delivered == 0 {
            self.dropped_count.fetch_add(1, Ordering::Relaxed);
            if self.topics.remove_if(topic, |_, t| t.live() == 0).is_some() {
                debug!(topic, "removed topic without subscribers");
                return 0;
            }
        }
        if stale {
            if let Some(mut entry) = self.topics.get_mut(topic) {
                entry.prune_routes();
            }
        }
        delivered
    }

    /// Удаляет тему вместе со всеми её подписками.
    ///
    /// Подписчики получают `Closed` после того, как дочитают очередь.
    pub fn unsubscribe_all(
        &self,
        topic: &str,
    ) -> bool {
        self.topics.remove(topic).is_some()
    }

    /// Количество живых подписчиков темы, сырых и отфильтрованных.
    pub fn subscriber_count(
        &self,
        topic: &str,
    ) -> usize {
        self.topics
            .get(topic)
            .map(|entry| entry.value().live())
            .unwrap_or(0)
    }

    /// Количество зарегистрированных тем.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Останавливает шину: закрывает все темы и отклоняет новые подписки.
    pub fn shutdown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let topics = self.topics.len();
        self.topics.clear();
        info!(
            topics,
            published = self.publish_count.load(Ordering::Relaxed),
            dropped = self.dropped_count.load(Ordering::Relaxed),
            "event bus shut down"
        );
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
