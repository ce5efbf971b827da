//! Wall-clock helpers shared by both mocks.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Milliseconds since the Unix epoch, used to derive ids and device codes.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Serialize as `2024-05-01T12:00:00.000Z`.
pub fn serialize_millis<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
