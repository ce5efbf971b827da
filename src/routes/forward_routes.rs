use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};

use crate::routes::extract::{object_or_empty, Lenient};
use crate::state::auth::AuthState;

pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/cli-forward", post(cli_forward))
        .with_state(state)
}

/// POST /cli-forward
///
/// Does what the CLI does with a pushed notification: relays it to the
/// receiver. Answers before the relay finishes, whatever its outcome.
async fn cli_forward(
    State(state): State<AuthState>,
    Lenient(body): Lenient<Value>,
) -> Json<Value> {
    let notification = object_or_empty(body);
    state.stats.record_forward();

    // Fire and forget: the handle is dropped, the task keeps running.
    drop(state.forwarder.dispatch(notification.clone()));

    Json(json!({
        "success": true,
        "message": format!("Notification forwarded to {}", state.forwarder.target()),
        "notification": notification,
    }))
}
