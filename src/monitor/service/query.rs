use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::notify::NotificationSink;
use crate::source::SnapshotSource;
use crate::status::Snapshot;

use super::super::state::{MonitorReport, MonitorState, PendingChangeView, notifications_within};
use super::core::{CycleError, CycleReport, run_status_cycle};

const RECENT_NOTIFICATIONS_SHOWN: usize = 10;

/// Read-only monitoring metadata for the status query surface. Copies out of
/// the shared state so callers never observe a cycle's partial mutation.
pub async fn monitor_report(
    state: &Arc<Mutex<MonitorState>>,
    required_confirmations: u32,
) -> MonitorReport {
    let now = Utc::now();
    let state = state.lock().await;

    let recent_notifications = state
        .notification_history
        .iter()
        .rev()
        .take(RECENT_NOTIFICATIONS_SHOWN)
        .cloned()
        .collect();

    let pending_changes = state
        .pending_changes
        .iter()
        .map(|(key, entry)| PendingChangeView {
            key: key.clone(),
            confirmation_count: entry.count,
            required_confirmations,
            first_seen: entry.first_seen,
        })
        .collect();

    MonitorReport {
        active: state.active,
        last_check: state.last_cycle_at,
        consecutive_errors: state.consecutive_errors,
        last_error: state.last_error.clone(),
        notifications_last_24h: notifications_within(
            &state.notification_history,
            ChronoDuration::hours(24),
            now,
        ),
        recent_notifications,
        pending_changes,
    }
}

pub async fn latest_snapshot(state: &Arc<Mutex<MonitorState>>) -> Option<Snapshot> {
    let state = state.lock().await;
    state.previous_snapshot.clone()
}

/// Operator-triggered immediate check, outside the loop's schedule. Runs the
/// exact same detection, gating and delivery path against the shared state.
pub async fn force_check<S: SnapshotSource, N: NotificationSink>(
    config: &Config,
    state: &Arc<Mutex<MonitorState>>,
    source: &mut S,
    sink: &N,
) -> Result<CycleReport, CycleError> {
    log::info!("force_check_started");
    let report = run_status_cycle(config, state, source, sink).await?;
    log::info!(
        "force_check_complete baseline={} detected={} sent={} failed={}",
        report.baseline,
        report.detected,
        report.sent,
        report.failed
    );
    Ok(report)
}
