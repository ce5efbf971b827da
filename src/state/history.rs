use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::clock::serialize_millis;

/// One request captured by the receiver sink.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

impl HistoryEntry {
    /// `type` field of the captured body, if it is a string.
    pub fn kind(&self) -> Option<&str> {
        self.body.get("type").and_then(Value::as_str)
    }

    /// `id` field of the captured body, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }
}

/// Fixed-capacity ring of entries, newest first.
#[derive(Debug)]
pub struct NotificationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl NotificationHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front, dropping the oldest entry once full.
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }

        self.entries.push_front(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }
}
