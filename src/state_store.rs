use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monitor::{MonitorState, NotificationRecord, PendingChange};
use crate::status::Snapshot;

/// Serialized form of the monitor's durable state. Everything ephemeral
/// (active flag, error counters) is rebuilt at startup instead.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub previous_snapshot: Option<Snapshot>,
    #[serde(default)]
    pub notification_history: Vec<NotificationRecord>,
    #[serde(default)]
    pub cooldowns: BTreeMap<String, DateTime<Utc>>,
    #[serde(default)]
    pub pending_changes: BTreeMap<String, PendingChange>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Error)]
pub enum StateStoreError {
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Missing or unreadable state is never fatal; the monitor simply starts
/// from an empty baseline.
pub fn load_state(path: &Path) -> PersistedState {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            log::info!("state_file_absent path={} starting_fresh", path.display());
            return PersistedState::default();
        }
        Err(error) => {
            log::warn!(
                "state_load_failed path={} error={} starting_fresh",
                path.display(),
                error
            );
            return PersistedState::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(state) => {
            log::info!("state_loaded path={}", path.display());
            state
        }
        Err(error) => {
            log::warn!(
                "state_file_corrupt path={} error={} starting_fresh",
                path.display(),
                error
            );
            PersistedState::default()
        }
    }
}

pub fn save_state(path: &Path, state: &MonitorState) -> Result<(), StateStoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StateStoreError::Write {
            path: path.display().to_string(),
            source,
        })?;
    }

    let persisted = PersistedState {
        previous_snapshot: state.previous_snapshot.clone(),
        notification_history: state.notification_history.clone(),
        cooldowns: state.cooldowns.clone(),
        pending_changes: state.pending_changes.clone(),
        saved_at: Some(Utc::now()),
    };

    let payload = serde_json::to_string_pretty(&persisted)?;
    fs::write(path, payload).map_err(|source| StateStoreError::Write {
        path: path.display().to_string(),
        source,
    })?;

    log::debug!("state_saved path={}", path.display());
    Ok(())
}

/// Rebuild in-memory monitor state from disk, trimming history to the
/// configured bound in case the limit shrank between runs.
pub fn restore_monitor_state(persisted: PersistedState, history_limit: usize) -> MonitorState {
    let mut notification_history = persisted.notification_history;
    if notification_history.len() > history_limit {
        let excess = notification_history.len() - history_limit;
        notification_history.drain(..excess);
    }

    MonitorState {
        previous_snapshot: persisted.previous_snapshot,
        pending_changes: persisted.pending_changes,
        notification_history,
        cooldowns: persisted.cooldowns,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::monitor::{MonitorState, NotificationRecord};
    use crate::status::Snapshot;

    use super::{load_state, restore_monitor_state, save_state};

    #[test]
    fn state_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data").join("monitoring_state.json");

        let mut state = MonitorState::default();
        let mut snapshot = Snapshot::at(Utc::now());
        snapshot
            .details
            .insert("github".to_string(), "OPERATIONAL".to_string());
        state.previous_snapshot = Some(snapshot);
        state.cooldowns.insert("github".to_string(), Utc::now());
        state.notification_history.push(NotificationRecord {
            service: "github".to_string(),
            timestamp: Utc::now(),
            status_change: "operational -> degraded".to_string(),
        });

        save_state(&path, &state).expect("save should create parent dirs");

        let restored = restore_monitor_state(load_state(&path), 50);
        assert_eq!(
            restored
                .previous_snapshot
                .expect("snapshot restored")
                .details
                .get("github")
                .map(String::as_str),
            Some("OPERATIONAL")
        );
        assert_eq!(restored.notification_history.len(), 1);
        assert!(restored.cooldowns.contains_key("github"));
        assert!(!restored.active, "runtime flags are not persisted");
    }

    #[test]
    fn missing_file_yields_empty_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let persisted = load_state(&dir.path().join("absent.json"));
        assert!(persisted.previous_snapshot.is_none());
        assert!(persisted.notification_history.is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").expect("write fixture");

        let persisted = load_state(&path);
        assert!(persisted.previous_snapshot.is_none());
    }

    #[test]
    fn restore_trims_oversized_history() {
        let mut persisted = super::PersistedState::default();
        for index in 0..10 {
            persisted.notification_history.push(NotificationRecord {
                service: format!("service-{}", index),
                timestamp: Utc::now(),
                status_change: "a -> b".to_string(),
            });
        }

        let restored = restore_monitor_state(persisted, 4);
        assert_eq!(restored.notification_history.len(), 4);
        assert_eq!(restored.notification_history[0].service, "service-6");
    }
}
