use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::status::{
    CanonicalStatus, MONITORED_SERVICES, Priority, Severity, Snapshot, normalize_status,
    service_priority,
};

use super::state::{PendingChange, pending_key};

const MAX_AFFECTED_COMPONENTS: usize = 5;

/// A confirmed, alert-worthy status change for one service. Produced here,
/// consumed by the notification gate in the same cycle, never stored.
#[derive(Debug, Clone)]
pub struct Transition {
    pub service: String,
    pub previous_raw: String,
    pub current_raw: String,
    pub previous_status: CanonicalStatus,
    pub current_status: CanonicalStatus,
    pub priority: Priority,
    pub severity: Severity,
    pub affected_components: Vec<String>,
    pub incident_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Compare two snapshots service by service and return the transitions that
/// are confirmed this cycle.
///
/// Outages, degradations and recoveries from either bypass the debounce
/// buffer and are emitted immediately. Everything else (maintenance windows,
/// investigations, opaque vendor statuses) must be observed for
/// `confirmation_cycles` consecutive cycles before it is emitted; the buffer
/// entry is consumed on emission. A buffered entry whose target status is no
/// longer what the service currently reports is dropped on sight, so the
/// buffer cannot accumulate stale confirmations.
pub fn detect_changes(
    current: &Snapshot,
    previous: &Snapshot,
    pending: &mut BTreeMap<String, PendingChange>,
    confirmation_cycles: u32,
    now: DateTime<Utc>,
) -> Vec<Transition> {
    let mut transitions = Vec::new();

    for service in MONITORED_SERVICES {
        // No observation this cycle means no transition can be computed.
        let Some(current_raw) = current.details.get(service) else {
            continue;
        };
        let previous_raw = previous
            .details
            .get(service)
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let current_status = normalize_status(current_raw);
        let previous_status = normalize_status(&previous_raw);

        evict_stale_pending(pending, service, &current_status);

        let key = pending_key(service, &current_status);

        // Equal snapshots carry no new change, unless a confirmation for this
        // exact target is already in flight and needs another observation.
        if current_status == previous_status
            && previous_status != CanonicalStatus::Unknown
            && !pending.contains_key(&key)
        {
            continue;
        }

        // First-ever sighting of a healthy service is the baseline, not news.
        if previous_status == CanonicalStatus::Unknown && current_status.is_operational() {
            continue;
        }

        let immediate = current_status.is_disruption()
            || (current_status.is_operational() && previous_status.is_disruption());

        let mut transition_previous_raw = previous_raw.clone();

        if !immediate {
            let confirmed = match pending.get_mut(&key) {
                Some(entry) => {
                    entry.count += 1;
                    log::info!(
                        "status_change_confirming service={} target={} count={}/{}",
                        service,
                        current_status,
                        entry.count,
                        confirmation_cycles
                    );
                    entry.count >= confirmation_cycles
                }
                None => {
                    pending.insert(
                        key.clone(),
                        PendingChange {
                            count: 1,
                            first_seen: now,
                            previous_raw: previous_raw.clone(),
                            current_raw: current_raw.clone(),
                        },
                    );
                    log::info!(
                        "status_change_buffered service={} target={} count=1/{}",
                        service,
                        current_status,
                        confirmation_cycles
                    );
                    confirmation_cycles <= 1
                }
            };

            if !confirmed {
                continue;
            }

            // The buffered entry remembers the status the change started from,
            // which the rolling previous snapshot may have caught up with.
            if let Some(entry) = pending.remove(&key) {
                transition_previous_raw = entry.previous_raw;
            }
        }

        let previous_status = normalize_status(&transition_previous_raw);
        let severity = Severity::from_status(&current_status);
        let priority = service_priority(service);

        log::info!(
            "status_change_detected service={} previous={} current={} priority={} severity={}",
            service,
            previous_status,
            current_status,
            priority,
            severity
        );

        transitions.push(Transition {
            service: service.to_string(),
            previous_raw: transition_previous_raw,
            current_raw: current_raw.clone(),
            previous_status,
            current_status,
            priority,
            severity,
            affected_components: affected_components(current, service),
            incident_id: format!("{}-{}", service, now.timestamp()),
            timestamp: now,
        });
    }

    transitions
}

/// Drop buffered confirmations for this service that target a status the
/// service is no longer reporting.
fn evict_stale_pending(
    pending: &mut BTreeMap<String, PendingChange>,
    service: &str,
    current_status: &CanonicalStatus,
) {
    let prefix = format!("{}:", service);
    let active_key = pending_key(service, current_status);
    pending.retain(|key, _| !key.starts_with(&prefix) || *key == active_key);
}

/// Names of components that are not operational themselves, capped so an
/// alert for a region-wide event stays readable.
fn affected_components(snapshot: &Snapshot, service: &str) -> Vec<String> {
    let Some(components) = snapshot.components.get(service) else {
        return Vec::new();
    };

    components
        .iter()
        .filter(|component| !normalize_status(&component.status).is_operational())
        .map(|component| component.name.clone())
        .take(MAX_AFFECTED_COMPONENTS)
        .collect()
}
