use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::{model::Envelope, RecvError, TryRecvError};

/// Подписка, получающая только конверты своего идентификатора корреляции.
///
/// Шина сверяет `envelope.correlation_id == correlation_id` при публикации и
/// кладёт совпавшие конверты в личную очередь подписки. Чужие конверты сюда
/// не попадают: они не буферизуются и не сообщаются, поэтому сколько бы ни
/// публиковали другие, свои конверты не теряются. Очередь держит только
/// ещё не прочитанное, истории темы в ней нет.
///
/// Отписка происходит сразу при `Drop`, на других подписчиков это не влияет.
#[derive(Debug)]
pub struct FilteredSubscription {
    topic: Arc<str>,
    correlation_id: Arc<str>,
    inner: mpsc::UnboundedReceiver<Envelope>,
}

impl FilteredSubscription {
    pub(crate) fn new(
        topic: Arc<str>,
        correlation_id: Arc<str>,
        inner: mpsc::UnboundedReceiver<Envelope>,
    ) -> Self {
        Self {
            topic,
            correlation_id,
            inner,
        }
    }

    /// Ожидает следующий конверт с совпадающим идентификатором.
    ///
    /// Возвращает `Err(RecvError::Closed)` только когда тема закрыта и очередь
    /// дочитана.
    pub async fn recv(&mut self) -> Result<Envelope, RecvError> {
        self.inner.recv().await.ok_or(RecvError::Closed)
    }

    /// Неблокирующий вариант [`FilteredSubscription::recv`]: `Empty` означает,
    /// что своих конвертов сейчас нет.
    pub fn try_recv(&mut self) -> Result<Envelope, TryRecvError> {
        self.inner.try_recv().map_err(Into::into)
    }

    /// Превращает подписку в `Stream` конвертов.
    ///
    /// Поток заканчивается, когда тема закрывается; при drop потока
    /// регистрация в шине освобождается.
    pub fn into_stream(self) -> impl Stream<Item = Envelope> + Send + 'static {
        UnboundedReceiverStream::new(self.inner)
    }

    /// Явно отписаться. Аналогично `drop(self)`.
    pub fn unsubscribe(self) {}

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn topic(&self) -> &Arc<str> {
        &self.topic
    }

    /// Подписка жива, пока тема не закрыта.
    pub fn is_live(&self) -> bool {
        !self.inner.is_closed()
    }

    /// Количество своих конвертов, ожидающих чтения.
    pub fn pending(&self) -> usize {
        self.inner.len()
    }
}
