use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use super::{server::AppState, ApiError};
use crate::{
    model::{QueryArgs, Record},
    QueryError,
};

// === POST /query ===

/// Запускает опрос всех источников. Ответ всегда пустой массив: записи
/// приходят через `/subscriptions`.
pub(crate) async fn handle_query(
    State(state): State<AppState>,
    payload: Result<Json<QueryArgs>, JsonRejection>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let Json(args) = payload.map_err(|rejection| QueryError::Malformed {
        reason: rejection.body_text(),
    })?;

    let records = state.dispatcher.handle_query(args)?;
    Ok(Json(records))
}

// === GET /health ===

#[derive(Debug, Serialize)]
pub(crate) struct Health {
    status: &'static str,
    topics: usize,
    subscribers: usize,
    in_flight: usize,
}

pub(crate) async fn handle_health(State(state): State<AppState>) -> Json<Health> {
    let status = if state.bus.is_closed() {
        "shutting_down"
    } else {
        "ok"
    };

    Json(Health {
        status,
        topics: state.bus.topic_count(),
        subscribers: state.bus.subscriber_count(&state.topic),
        in_flight: state.dispatcher.in_flight(),
    })
}
