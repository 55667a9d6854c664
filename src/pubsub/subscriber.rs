use std::sync::Arc;

use futures::Stream;
use tokio::sync::broadcast;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt,
};
use tracing::warn;

use crate::{model::Envelope, RecvError, TryRecvError};

/// Подписка на тему шины по имени.
///
/// Асинхронный интерфейс получения конвертов без прямого доступа к
/// внутреннему `broadcast::Receiver`. Поток бесконечен и заканчивается только
/// отпиской или остановкой шины.
///
/// Отписка происходит автоматически при `Drop`.
#[derive(Debug)]
pub struct Subscription {
    /// Тема, на которую подписаны.
    pub topic: Arc<str>,
    /// Внутренний приёмник для входящих конвертов.
    pub(crate) inner: broadcast::Receiver<Envelope>,
}

impl Subscription {
    pub(crate) fn new(
        topic: Arc<str>,
        inner: broadcast::Receiver<Envelope>,
    ) -> Self {
        Self { topic, inner }
    }

    /// Асинхронно ожидает следующий конверт темы.
    ///
    /// # Возвращает
    /// - `Ok(Envelope)` при успешном получении
    /// - `Err(RecvError::Closed)` если тема закрыта
    /// - `Err(RecvError::Lagged(n))` если приёмник отстал на `n` конвертов
    pub async fn recv(&mut self) -> Result<Envelope, RecvError> {
        self.inner.recv().await.map_err(Into::into)
    }

    /// Пытается получить конверт без ожидания.
    pub fn try_recv(&mut self) -> Result<Envelope, TryRecvError> {
        self.inner.try_recv().map_err(Into::into)
    }

    /// Превращает подписку в `Stream` конвертов. Отставание логируется, поток
    /// продолжается с самого старого из сохранившихся конвертов.
    pub fn into_stream(self) -> impl Stream<Item = Envelope> + Send + 'static {
        let topic = self.topic;
        BroadcastStream::new(self.inner).filter_map(move |item| match item {
            Ok(envelope) => Some(envelope),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(topic = %topic, skipped, "raw subscriber lagged, envelopes dropped");
                None
            }
        })
    }

    /// Явно отписаться от темы. Аналогично `drop(self)`.
    ///
    /// Повторно отписаться нельзя: метод поглощает подписку.
    pub fn unsubscribe(self) {
        // При drop Receiver отписывается сам
    }

    /// Имя темы.
    pub fn topic(&self) -> &Arc<str> {
        &self.topic
    }

    /// Проверяет, закрыта ли тема (нет активных отправителей).
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Количество конвертов в очереди на получение.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::broadcast;

    use super::*;
    use crate::EventBus;

    fn envelope(correlation_id: &str) -> Envelope {
        Envelope::new(Vec::new(), Arc::from(correlation_id), Arc::from("test"))
    }

    /// Тест проверяет, что имя темы остаётся доступным и после шины.
    #[tokio::test]
    async fn test_subscription_topic_name() {
        let sub = {
            let bus = EventBus::new(10);
            let sub = bus.subscribe("mytopic");
            assert_eq!(&**sub.topic(), "mytopic");
            sub
        };
        assert_eq!(&*sub.topic, "mytopic");
        assert!(sub.is_closed());
    }

    /// Тест проверяет, что дроп подписки уменьшает счётчик слушателей.
    #[test]
    fn test_unsubscribe_drops_receiver() {
        let (tx, rx) = broadcast::channel(5);
        let sub = Subscription::new(Arc::from("foo"), rx);
        assert_eq!(tx.receiver_count(), 1);
        sub.unsubscribe();
        assert_eq!(tx.receiver_count(), 0);
    }

    /// Тест проверяет очередь подписки и неблокирующее чтение.
    #[tokio::test]
    async fn test_len_and_try_recv() {
        let bus = EventBus::new(10);
        let mut sub = bus.subscribe("q");
        assert!(sub.is_empty());

        bus.publish("q", envelope("a"));
        bus.publish("q", envelope("b"));
        assert_eq!(sub.len(), 2);

        assert_eq!(sub.try_recv().unwrap().correlation_id(), "a");
        assert_eq!(sub.recv().await.unwrap().correlation_id(), "b");
        assert_eq!(sub.try_recv(), Err(TryRecvError::Empty));
    }

    /// Тест проверяет, что поток сырой подписки переживает отставание.
    #[tokio::test]
    async fn test_into_stream_skips_over_lag() {
        let bus = EventBus::new(2);
        let stream = Box::pin(bus.subscribe("q").into_stream());
        for id in ["a", "b", "c", "d"] {
            bus.publish("q", envelope(id));
        }
        bus.shutdown();

        let got: Vec<String> = stream
            .map(|e| e.correlation_id().to_string())
            .collect()
            .await;
        assert_eq!(got, ["c", "d"]);
    }
}
