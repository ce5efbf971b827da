use axum::{extract::State, routing::{get, post}, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::routes::extract::Lenient;
use crate::services::notification_service::{self, SendNotificationRequest};
use crate::state::auth::{AuthState, StatsSnapshot};

/// Routes nested under /admin.
pub fn routes(state: AuthState) -> Router {
    Router::new()
        .route("/send-notification", post(send_notification))
        .route("/stats", get(stats))
        .with_state(state)
}

/// POST /admin/send-notification
async fn send_notification(
    State(state): State<AuthState>,
    Lenient(req): Lenient<SendNotificationRequest>,
) -> Json<Value> {
    let notification = notification_service::build_notification(req, Utc::now());

    let sent = notification_service::broadcast(&state.connections, &state.stats, &notification)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Could not serialize notification {}: {}", notification.id, e);
            0
        });

    Json(json!({
        "success": true,
        "sent_to": sent,
        "notification": notification,
    }))
}

/// GET /admin/stats
async fn stats(State(state): State<AuthState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot(&state.config.receiver_url))
}
