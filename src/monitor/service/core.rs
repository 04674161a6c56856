use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::config::Config;
use crate::notify::NotificationSink;
use crate::source::SnapshotSource;

use super::super::detector::detect_changes;
use super::super::gate::should_notify;
use super::super::state::MonitorState;

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("monitoring cycle exceeded its {0}s deadline")]
    Timeout(u64),
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CycleReport {
    pub baseline: bool,
    pub detected: usize,
    pub sent: usize,
    pub failed: usize,
}

/// One full monitoring pass: fetch a snapshot under the cycle deadline,
/// detect transitions against the stored previous snapshot, gate each one,
/// then attempt delivery for the approved set.
///
/// The state lock is held for detection and gating only; delivery happens
/// after gate bookkeeping is committed, so a failed send never rolls back a
/// cooldown or history entry (at-most-once delivery attempt per approved
/// transition).
pub async fn run_status_cycle<S: SnapshotSource, N: NotificationSink>(
    config: &Config,
    state: &Arc<Mutex<MonitorState>>,
    source: &mut S,
    sink: &N,
) -> Result<CycleReport, CycleError> {
    let deadline = Duration::from_secs(config.monitor.cycle_timeout_secs);
    let current = timeout(deadline, source.fetch_snapshot())
        .await
        .map_err(|_| CycleError::Timeout(config.monitor.cycle_timeout_secs))?;

    let now = Utc::now();
    let (approved, detected, baseline) = {
        let mut guard = state.lock().await;
        let monitor = &mut *guard;
        monitor.last_cycle_at = Some(now);

        let Some(previous) = monitor.previous_snapshot.take() else {
            log::info!(
                "baseline_established services={}",
                current.details.len()
            );
            monitor.previous_snapshot = Some(current);
            return Ok(CycleReport {
                baseline: true,
                ..Default::default()
            });
        };

        let transitions = detect_changes(
            &current,
            &previous,
            &mut monitor.pending_changes,
            config.monitor.confirmation_cycles,
            now,
        );
        let detected = transitions.len();

        let mut approved = Vec::with_capacity(transitions.len());
        for transition in transitions {
            let allowed = should_notify(
                &transition,
                &mut monitor.cooldowns,
                &mut monitor.notification_history,
                config.monitor.max_notifications_per_hour,
                config.monitor.cooldown_secs,
                config.state.history_limit,
                now,
            );
            if allowed {
                approved.push(transition);
            }
        }

        monitor.previous_snapshot = Some(current);
        (approved, detected, false)
    };

    let mut sent = 0;
    let mut failed = 0;
    for transition in &approved {
        if sink.send_alert(transition).await {
            sent += 1;
        } else {
            failed += 1;
            log::warn!(
                "notification_failed service={} incident_id={}",
                transition.service,
                transition.incident_id
            );
        }
    }

    tracing::info!(
        target: "monitor",
        detected,
        sent,
        failed,
        "cycle_complete"
    );

    Ok(CycleReport {
        baseline,
        detected,
        sent,
        failed,
    })
}
