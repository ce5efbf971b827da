use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use crate::state::history::{HistoryEntry, NotificationHistory};

/// Shared state of the receiver mock.
#[derive(Clone)]
pub struct ReceiverState {
    history: Arc<RwLock<NotificationHistory>>,
    started: Instant,
}

impl ReceiverState {
    pub fn new(max_history: usize) -> Self {
        Self {
            history: Arc::new(RwLock::new(NotificationHistory::with_capacity(max_history))),
            started: Instant::now(),
        }
    }

    /// Store an entry and return the resulting history length.
    pub fn record(&self, entry: HistoryEntry) -> usize {
        let mut history = self.history.write().unwrap_or_else(PoisonError::into_inner);
        history.push(entry);
        history.len()
    }

    /// Copy of the history, newest first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        let history = self.history.read().unwrap_or_else(PoisonError::into_inner);
        history.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.history
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seconds since the state was created, with sub-second precision.
    pub fn uptime(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}
