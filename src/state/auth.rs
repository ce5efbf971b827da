use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::clock::serialize_millis;
use crate::config::AuthConfig;
use crate::services::forward_service::Forwarder;
use crate::services::ws_registry::ConnectionRegistry;

/// Number of `/token` polls after which the device counts as approved.
pub const POLLS_BEFORE_GRANT: u64 = 3;

/// Counter value set by the verification page's "Authorize" button.
pub const AUTHORIZED_SENTINEL: u64 = 999;

/// Poll counter shared by every caller of `/token`.
///
/// Only ever grows; `force_authorize` uses `fetch_max` so a later poll
/// never moves it backwards.
#[derive(Debug, Default)]
pub struct TokenPollState {
    polls: AtomicU64,
}

impl TokenPollState {
    /// Count one poll and return the new value.
    pub fn record_poll(&self) -> u64 {
        self.polls.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Jump straight to the authorized sentinel.
    pub fn force_authorize(&self) -> u64 {
        self.polls
            .fetch_max(AUTHORIZED_SENTINEL, Ordering::SeqCst)
            .max(AUTHORIZED_SENTINEL)
    }

    pub fn current(&self) -> u64 {
        self.polls.load(Ordering::SeqCst)
    }
}

/// Process counters exposed by `/admin/stats`.
#[derive(Debug)]
pub struct Stats {
    started_at: DateTime<Utc>,
    started: Instant,
    notifications_sent: AtomicU64,
    forwarded_requests: AtomicU64,
    ws_connections: AtomicI64,
}

/// Point-in-time copy of [`Stats`].
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    #[serde(serialize_with = "serialize_millis")]
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub ws_connections: i64,
    pub notifications_sent: u64,
    pub forwarded_requests: u64,
    pub receiver_url: String,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            started: Instant::now(),
            notifications_sent: AtomicU64::new(0),
            forwarded_requests: AtomicU64::new(0),
            ws_connections: AtomicI64::new(0),
        }
    }

    pub fn add_notifications_sent(&self, count: u64) {
        self.notifications_sent.fetch_add(count, Ordering::SeqCst);
    }

    pub fn record_forward(&self) {
        self.forwarded_requests.fetch_add(1, Ordering::SeqCst);
    }

    pub fn connection_opened(&self) {
        self.ws_connections.fetch_add(1, Ordering::SeqCst);
    }

    // No floor: an unmatched close shows up as a negative count.
    pub fn connection_closed(&self) {
        self.ws_connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn snapshot(&self, receiver_url: &str) -> StatsSnapshot {
        StatsSnapshot {
            started_at: self.started_at,
            uptime_seconds: self.started.elapsed().as_secs(),
            ws_connections: self.ws_connections.load(Ordering::SeqCst),
            notifications_sent: self.notifications_sent.load(Ordering::SeqCst),
            forwarded_requests: self.forwarded_requests.load(Ordering::SeqCst),
            receiver_url: receiver_url.to_string(),
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the auth/notify handlers share. Cheap to clone.
#[derive(Clone)]
pub struct AuthState {
    pub config: Arc<AuthConfig>,
    pub polls: Arc<TokenPollState>,
    pub stats: Arc<Stats>,
    pub connections: ConnectionRegistry,
    pub forwarder: Forwarder,
}

impl AuthState {
    /// Fresh state with zeroed counters. Spawns the connection registry,
    /// so it must be called inside a tokio runtime.
    pub fn new(config: AuthConfig) -> Self {
        let forwarder = Forwarder::new(config.receiver_url.clone());

        Self {
            config: Arc::new(config),
            polls: Arc::new(TokenPollState::default()),
            stats: Arc::new(Stats::new()),
            connections: ConnectionRegistry::spawn(),
            forwarder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polls_count_up_from_one() {
        let polls = TokenPollState::default();

        assert_eq!(polls.record_poll(), 1);
        assert_eq!(polls.record_poll(), 2);
        assert_eq!(polls.current(), 2);
    }

    #[test]
    fn force_authorize_never_lowers_the_counter() {
        let polls = TokenPollState::default();
        assert_eq!(polls.force_authorize(), AUTHORIZED_SENTINEL);
        assert_eq!(polls.record_poll(), AUTHORIZED_SENTINEL + 1);

        // Already past the sentinel: stays where it is.
        assert_eq!(polls.force_authorize(), AUTHORIZED_SENTINEL + 1);
        assert_eq!(polls.current(), AUTHORIZED_SENTINEL + 1);
    }

    #[test]
    fn snapshot_reflects_counters() {
        let stats = Stats::new();
        stats.add_notifications_sent(3);
        stats.record_forward();
        stats.connection_opened();
        stats.connection_opened();
        stats.connection_closed();

        let snap = stats.snapshot("http://receiver");
        assert_eq!(snap.notifications_sent, 3);
        assert_eq!(snap.forwarded_requests, 1);
        assert_eq!(snap.ws_connections, 1);
        assert_eq!(snap.receiver_url, "http://receiver");
    }

    #[test]
    fn unmatched_close_goes_negative() {
        let stats = Stats::new();
        stats.connection_closed();
        assert_eq!(stats.snapshot("").ws_connections, -1);
    }
}
