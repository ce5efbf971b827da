use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::clock::serialize_millis;
use crate::services::ws_registry::ConnectionRegistry;
use crate::state::auth::Stats;

pub const DEFAULT_NOTIFICATION_TYPE: &str = "payment";

/// Frame pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub data: Value,
}

/// Body of `/admin/send-notification`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SendNotificationRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub data: Option<Value>,
}

/// Payload every test notification starts from.
pub fn default_payload() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("amount".to_string(), json!(1000));
    data.insert("currency".to_string(), json!("BRL"));
    data.insert("description".to_string(), json!("Test notification"));
    data.insert("status".to_string(), json!("approved"));
    data
}

/// Default payload overlaid with the caller's `data`. A non-object
/// `data` is ignored.
pub fn build_notification(req: SendNotificationRequest, now: DateTime<Utc>) -> Notification {
    let mut data = default_payload();

    if let Some(Value::Object(overrides)) = req.data {
        data.extend(overrides);
    }

    Notification {
        id: format!("notif_{}", now.timestamp_millis()),
        kind: req
            .kind
            .unwrap_or_else(|| DEFAULT_NOTIFICATION_TYPE.to_string()),
        timestamp: now,
        data: Value::Object(data),
    }
}

/// First frame sent on an accepted connection.
pub fn connection_established(now: DateTime<Utc>) -> Notification {
    Notification {
        id: format!("conn_{}", now.timestamp_millis()),
        kind: "connection_established".to_string(),
        timestamp: now,
        data: json!({ "message": "Connection established" }),
    }
}

/// Push `notification` to every open connection and count the recipients
/// in `stats`.
pub async fn broadcast(
    registry: &ConnectionRegistry,
    stats: &Stats,
    notification: &Notification,
) -> Result<usize, serde_json::Error> {
    let payload = serde_json::to_string(notification)?;
    let sent = registry.broadcast(payload).await;

    stats.add_notifications_sent(sent as u64);

    tracing::info!(
        "Notification {} ({}) sent to {} connections",
        notification.id,
        notification.kind,
        sent
    );

    Ok(sent)
}
