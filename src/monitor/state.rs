use std::collections::BTreeMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};

use crate::status::{CanonicalStatus, Snapshot};

/// One buffered non-critical status change waiting for reconfirmation before
/// it is allowed to become a transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingChange {
    pub count: u32,
    pub first_seen: DateTime<Utc>,
    pub previous_raw: String,
    pub current_raw: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub status_change: String,
}

/// All mutable monitoring state. Owned exclusively by the monitor loop behind
/// the `AppContext` mutex; the query surface only clones out of it.
#[derive(Debug, Default)]
pub struct MonitorState {
    pub previous_snapshot: Option<Snapshot>,
    pub pending_changes: BTreeMap<String, PendingChange>,
    pub notification_history: Vec<NotificationRecord>,
    pub cooldowns: BTreeMap<String, DateTime<Utc>>,
    pub active: bool,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    pub last_cycle_at: Option<DateTime<Utc>>,
}

/// Debounce buffer key: one slot per (service, target canonical status) pair.
pub fn pending_key(service: &str, target: &CanonicalStatus) -> String {
    format!("{}:{}", service, target)
}

pub fn record_notification(
    history: &mut Vec<NotificationRecord>,
    record: NotificationRecord,
    limit: usize,
) {
    history.push(record);
    if history.len() > limit {
        let excess = history.len() - limit;
        history.drain(..excess);
    }
}

pub fn notifications_within(
    history: &[NotificationRecord],
    window: ChronoDuration,
    now: DateTime<Utc>,
) -> usize {
    history
        .iter()
        .filter(|record| now - record.timestamp < window)
        .count()
}

/// Read-only view of the monitor for the status query surface.
#[derive(Debug, Clone, Serialize)]
pub struct MonitorReport {
    pub active: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub consecutive_errors: u32,
    pub last_error: Option<String>,
    pub notifications_last_24h: usize,
    pub recent_notifications: Vec<NotificationRecord>,
    pub pending_changes: Vec<PendingChangeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingChangeView {
    pub key: String,
    pub confirmation_count: u32,
    pub required_confirmations: u32,
    pub first_seen: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};

    use super::{NotificationRecord, notifications_within, record_notification};

    fn record_at(minutes_ago: i64) -> NotificationRecord {
        NotificationRecord {
            service: "github".to_string(),
            timestamp: Utc::now() - ChronoDuration::minutes(minutes_ago),
            status_change: "OPERATIONAL -> DEGRADED".to_string(),
        }
    }

    #[test]
    fn history_is_bounded_by_dropping_oldest() {
        let mut history = Vec::new();
        for age in (0..6).rev() {
            record_notification(&mut history, record_at(age), 3);
        }

        assert_eq!(history.len(), 3);
        assert!(history[0].timestamp < history[2].timestamp);
    }

    #[test]
    fn trailing_window_count_excludes_old_entries() {
        let history = vec![record_at(90), record_at(30), record_at(5)];
        let count = notifications_within(&history, ChronoDuration::hours(1), Utc::now());
        assert_eq!(count, 2);
    }
}
