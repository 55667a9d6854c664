use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{server::AppState, ApiError};
use crate::{pubsub::FilteredSubscription, QueryError};

// === WebSocket: /subscriptions?correlationId=.. ===

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionParams {
    #[serde(alias = "userID")]
    correlation_id: Option<String>,
}

/// Подписка создаётся до ответа `101`, поэтому к моменту, когда клиент
/// видит рукопожатие, она уже активна.
pub(crate) async fn handle_subscribe(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionParams>,
    ws: WebSocketUpgrade,
) -> Response {
    let correlation_id = match params.correlation_id {
        Some(id) if !id.trim().is_empty() => id,
        Some(_) => return ApiError::from(QueryError::BlankCorrelationId).into_response(),
        None => {
            return ApiError::from(QueryError::MissingField {
                field: "correlationId",
            })
            .into_response()
        }
    };

    let subscription = state.bus.subscribe_filtered(&state.topic, correlation_id);
    ws.on_upgrade(move |socket| ws_connection(socket, subscription))
}

async fn ws_connection(
    mut socket: WebSocket,
    mut subscription: FilteredSubscription,
) {
    info!(
        correlation_id = subscription.correlation_id(),
        topic = %subscription.topic(),
        "subscriber attached"
    );

    loop {
        tokio::select! {
            biased;

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                }
            }

            envelope = subscription.recv() => {
                let envelope = match envelope {
                    Ok(envelope) => envelope,
                    Err(_) => {
                        let _ = socket.send(Message::Close(None)).await;
                        break;
                    }
                };

                let json = match serde_json::to_string(&envelope) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "failed to encode envelope");
                        continue;
                    }
                };

                debug!(
                    correlation_id = subscription.correlation_id(),
                    source = envelope.source(),
                    records = envelope.records().len(),
                    "forwarding envelope"
                );
                if socket.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!(
        correlation_id = subscription.correlation_id(),
        "subscriber detached"
    );
    subscription.unsubscribe();
}
