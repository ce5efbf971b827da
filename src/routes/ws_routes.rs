use std::time::Duration;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
    routing::get,
    Router,
};
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::services::device_service::token_is_valid;
use crate::services::notification_service::connection_established;
use crate::state::auth::AuthState;

/// How long a closing socket may take to flush its last frames.
const CLOSE_FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// WebSocket push channel, served on `/ws` and on `/`.
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/ws", get(upgrade))
        .route("/", get(upgrade))
        .with_state(state)
}

/// Query pairs in order. Deserializing into pairs never rejects, so a bad
/// query still reaches the upgrade and is refused with a close frame.
type QueryPairs = Vec<(String, String)>;

/// First `token` parameter; repeats are ignored.
fn first_token(pairs: QueryPairs) -> Option<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value)
}

async fn upgrade(
    ws: WebSocketUpgrade,
    Query(pairs): Query<QueryPairs>,
    State(state): State<AuthState>,
) -> Response {
    let token = first_token(pairs);
    ws.on_upgrade(move |socket| handle_socket(socket, state, token))
}

async fn handle_socket(mut socket: WebSocket, state: AuthState, token: Option<String>) {
    if !token_is_valid(token.as_deref()) {
        warn!("WebSocket: connection rejected, invalid token");
        let _ = socket
            .send(Message::Close(Some(CloseFrame {
                code: close_code::POLICY,
                reason: "invalid token".into(),
            })))
            .await;
        return;
    }

    // Queue the greeting before registering so it is always the first frame.
    let (outbox, mut inbox) = mpsc::unbounded_channel::<String>();
    match serde_json::to_string(&connection_established(Utc::now())) {
        Ok(greeting) => {
            let _ = outbox.send(greeting);
        }
        Err(e) => warn!("Could not serialize greeting: {}", e),
    }

    state.stats.connection_opened();
    let Some(id) = state.connections.register(outbox).await else {
        warn!("WebSocket: connection registry unavailable");
        state.stats.connection_closed();
        return;
    };

    info!("WebSocket: connection {} opened with token {:?}", id, token);

    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = inbox.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                return;
            }
        }
        // Outbox gone: flush the close reply, or start the close handshake.
        let _ = sender.close().await;
    });

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => info!("WebSocket: message from {}: {}", id, text),
            Ok(Message::Binary(bytes)) => {
                info!("WebSocket: {} binary bytes from {}", bytes.len(), id)
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!("WebSocket: read error on {}: {}", id, e);
                break;
            }
        }
    }

    // Unregistering drops the last outbox sender, which ends the send task.
    state.connections.unregister(id);
    state.stats.connection_closed();

    if tokio::time::timeout(CLOSE_FLUSH_TIMEOUT, &mut send_task)
        .await
        .is_err()
    {
        debug!("WebSocket: close of {} not flushed in time", id);
        send_task.abort();
    }

    info!("WebSocket: connection {} closed", id);
}
