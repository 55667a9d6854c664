//! Общие помощники интеграционных тестов: поддельный upstream на axum и
//! сборка настроек.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recordcast::{
    config::{SourceSettings, UpstreamSettings},
    logging::LoggingConfig,
    Address, CaseDetail, Record, Settings, RECORDS_IN_RADIUS,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// Верхняя граница любого ожидания в тестах.
pub const WAIT: Duration = Duration::from_secs(5);

/// Запись, по которой видно, какой источник её вернул.
pub fn record_from(source: &str) -> Record {
    Record {
        first_name: source.to_string(),
        last_name: "Doe".to_string(),
        middle_name: None,
        age: 42,
        dob: "1983-04-01".to_string(),
        address: Address {
            location: "Main St".to_string(),
            latitude: 40.71,
            longitude: -74.0,
        },
        case_detail: CaseDetail {
            kind: source.to_string(),
            date: "2024-02-29".to_string(),
        },
    }
}

#[derive(Clone, Default)]
struct MockState {
    seen: Arc<Mutex<Vec<(String, HashMap<String, String>)>>>,
}

/// Поддельный upstream:
///
/// - `GET /records/{name}`: одна запись с `firstName = name`;
/// - `GET /slow/{name}`: то же, но через 200 мс;
/// - `GET /status/{code}`: пустой ответ с этим статусом;
/// - `GET /garbage`: 200 с телом, которое не является JSON.
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: MockState,
    handle: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/records/{name}", get(records))
            .route("/slow/{name}", get(slow_records))
            .route("/status/{code}", get(status))
            .route("/garbage", get(garbage))
            .with_state(state.clone());

        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Параметры запросов, пришедших на `/records/{name}` и `/slow/{name}`.
    pub fn seen(&self) -> Vec<(String, HashMap<String, String>)> {
        self.state.seen.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn records(
    State(state): State<MockState>,
    Path(name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Record>> {
    state.seen.lock().unwrap().push((name.clone(), params));
    Json(vec![record_from(&name)])
}

async fn slow_records(
    state: State<MockState>,
    name: Path<String>,
    params: Query<HashMap<String, String>>,
) -> Json<Vec<Record>> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    records(state, name, params).await
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn garbage() -> &'static str {
    "definitely not json"
}

/// Настройки с заданными источниками `(имя, путь)`.
pub fn settings(
    base_url: &str,
    sources: &[(&str, &str)],
) -> Settings {
    Settings {
        listen_address: "127.0.0.1:0".parse().unwrap(),
        topic: RECORDS_IN_RADIUS.to_string(),
        bus_capacity: 64,
        shutdown_grace_ms: 1000,
        upstream: UpstreamSettings {
            base_url: base_url.to_string(),
        },
        sources: sources
            .iter()
            .map(|(name, path)| SourceSettings {
                name: name.to_string(),
                path: path.to_string(),
            })
            .collect(),
        logging: LoggingConfig::default(),
    }
}
