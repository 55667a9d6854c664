use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::Settings,
    dispatch::{Dispatcher, SourcePublisher},
    network::{router, AppState},
    pubsub::EventBus,
    upstream::{HttpRecordSource, RecordSource},
    ConfigError,
};

/// Собранный сервис: шина, диспетчер и маршруты.
pub struct App {
    bus: Arc<EventBus>,
    dispatcher: Arc<Dispatcher>,
    router: Router,
    shutdown_grace: Duration,
}

impl App {
    /// Собирает сервис с HTTP-источником записей.
    pub fn build(settings: Settings) -> Result<Self, ConfigError> {
        Self::with_source(settings, Arc::new(HttpRecordSource::new()))
    }

    /// Собирает сервис с произвольной реализацией [`RecordSource`].
    pub fn with_source(
        settings: Settings,
        source: Arc<dyn RecordSource>,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        let endpoints = settings.source_endpoints()?;

        let bus = Arc::new(EventBus::new(settings.bus_capacity));
        let publisher = SourcePublisher::new(source, bus.clone(), settings.topic.as_str());
        let dispatcher = Arc::new(Dispatcher::new(publisher, endpoints));
        let router = router(AppState::new(dispatcher.clone(), bus.clone()));

        Ok(Self {
            bus,
            dispatcher,
            router,
            shutdown_grace: settings.shutdown_grace(),
        })
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Обслуживает соединения, пока не завершится `shutdown`.
    ///
    /// После остановки приёма ждёт публикаторов в полёте и закрывает шину,
    /// чтобы открытые подписки завершились.
    pub async fn serve<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        info!(
            %addr,
            topic = %self.dispatcher.topic(),
            sources = self.dispatcher.endpoints().len(),
            "recordcast listening"
        );

        let result = axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await;

        info!("http server stopped");
        let drained = self.dispatcher.shutdown(self.shutdown_grace).await;
        self.bus.shutdown();
        info!(drained, stats = ?self.dispatcher.stats(), "shutdown complete");

        result
    }
}
