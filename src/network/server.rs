use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{routes, ws};
use crate::{dispatch::Dispatcher, pubsub::EventBus};

/// Общее состояние обработчиков.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub bus: Arc<EventBus>,
    pub topic: Arc<str>,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        bus: Arc<EventBus>,
    ) -> Self {
        let topic = dispatcher.topic().clone();
        Self {
            dispatcher,
            bus,
            topic,
        }
    }
}

/// Маршруты шлюза с CORS (любой origin) и трассировкой запросов.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", post(routes::handle_query))
        .route("/subscriptions", get(ws::handle_subscribe))
        .route("/health", get(routes::handle_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Завершается по Ctrl-C или SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c"),
        _ = terminate => info!("received SIGTERM"),
    }
}
