use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::clock::serialize_millis;
use crate::routes::extract::{object_or_empty, Lenient};
use crate::state::history::HistoryEntry;
use crate::state::receiver::ReceiverState;
use crate::views::history_page;

/// Receiver routes. Every POST, on any path, is a notification.
pub fn routes(state: ReceiverState) -> Router {
    Router::new()
        .route("/", get(history).post(receive))
        .route("/health", get(health).post(receive))
        .fallback(any_path)
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ReceiveAck {
    success: bool,
    message: &'static str,
    #[serde(serialize_with = "serialize_millis")]
    timestamp: chrono::DateTime<Utc>,
}

//
// ─────────────────────────────────────────────────────────────
// POST /*
// Store the request in history and acknowledge
// ─────────────────────────────────────────────────────────────
//
async fn receive(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    State(state): State<ReceiverState>,
    Lenient(body): Lenient<Value>,
) -> Response {
    let entry = HistoryEntry {
        timestamp: Utc::now(),
        path: uri.path().to_string(),
        method: method.to_string(),
        headers: header_map(&headers),
        body: object_or_empty(body),
    };

    tracing::info!(
        "Notification received: path={} type={} id={} payload={}",
        entry.path,
        entry.kind().unwrap_or("unknown"),
        entry.id().unwrap_or("no id"),
        entry.body
    );

    let ack = ReceiveAck {
        success: true,
        message: "Notification received",
        timestamp: entry.timestamp,
    };

    let stored = state.record(entry);
    tracing::debug!("History now holds {} notifications", stored);

    (StatusCode::OK, Json(ack)).into_response()
}

async fn any_path(
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    state: State<ReceiverState>,
    body: Lenient<Value>,
) -> Response {
    if method == Method::POST {
        receive(method, uri, headers, state, body).await
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /
// History page, newest first
// ─────────────────────────────────────────────────────────────
//
async fn history(State(state): State<ReceiverState>) -> Html<String> {
    Html(history_page::render(&state.snapshot()))
}

//
// ─────────────────────────────────────────────────────────────
// GET /health
// ─────────────────────────────────────────────────────────────
//
async fn health(State(state): State<ReceiverState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime": state.uptime(),
        "notifications_received": state.len(),
    }))
}

/// Header names are already lower case; repeated headers are joined.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        out.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    out
}
