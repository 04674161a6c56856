use std::collections::BTreeMap;

use chrono::{DateTime, Duration as ChronoDuration, Utc};

use super::detector::Transition;
use super::state::{NotificationRecord, notifications_within, record_notification};

/// Decide whether a confirmed transition becomes an outbound alert.
///
/// Cooldown table and history are mutated only on an allow decision, so a
/// denied call leaves the gate state exactly as it found it. Recoveries are
/// never suppressed; they refresh the service's cooldown clock but do not
/// count against the hourly cap.
pub fn should_notify(
    transition: &Transition,
    cooldowns: &mut BTreeMap<String, DateTime<Utc>>,
    history: &mut Vec<NotificationRecord>,
    max_per_hour: u32,
    cooldown_secs: u64,
    history_limit: usize,
    now: DateTime<Utc>,
) -> bool {
    let service = transition.service.as_str();

    if transition.current_status.is_operational() && !transition.previous_status.is_operational() {
        log::info!("recovery_notification_allowed service={}", service);
        cooldowns.insert(service.to_string(), now);
        return true;
    }

    if let Some(last) = cooldowns.get(service) {
        let elapsed = (now - *last).num_seconds();
        if elapsed < cooldown_secs as i64 {
            log::info!(
                "notification_suppressed service={} reason=cooldown remaining_secs={}",
                service,
                cooldown_secs as i64 - elapsed
            );
            return false;
        }
    }

    let recent = notifications_within(history, ChronoDuration::hours(1), now);
    if recent >= max_per_hour as usize {
        log::warn!(
            "notification_suppressed service={} reason=hourly_rate_limit recent={}",
            service,
            recent
        );
        return false;
    }

    record_notification(
        history,
        NotificationRecord {
            service: service.to_string(),
            timestamp: now,
            status_change: format!("{} -> {}", transition.previous_raw, transition.current_raw),
        },
        history_limit,
    );
    cooldowns.insert(service.to_string(), now);
    true
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration as ChronoDuration, Utc};

    use crate::monitor::Transition;
    use crate::status::{Priority, Severity, normalize_status};

    use super::should_notify;

    fn transition(service: &str, previous: &str, current: &str) -> Transition {
        Transition {
            service: service.to_string(),
            previous_raw: previous.to_string(),
            current_raw: current.to_string(),
            previous_status: normalize_status(previous),
            current_status: normalize_status(current),
            priority: Priority::Medium,
            severity: Severity::Warning,
            affected_components: Vec::new(),
            incident_id: format!("{}-0", service),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn recovery_is_always_allowed_and_resets_the_cooldown_clock() {
        let now = Utc::now();
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("github".to_string(), now - ChronoDuration::seconds(10));
        let mut history = Vec::new();

        let allowed = should_notify(
            &transition("github", "major_outage", "operational"),
            &mut cooldowns,
            &mut history,
            20,
            300,
            50,
            now,
        );

        assert!(allowed, "recoveries must never be suppressed");
        assert_eq!(cooldowns.get("github"), Some(&now));
        assert!(history.is_empty(), "recoveries do not count against the cap");
    }

    #[test]
    fn cooldown_denies_and_leaves_state_untouched() {
        let now = Utc::now();
        let last = now - ChronoDuration::seconds(100);
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("jira".to_string(), last);
        let mut history = Vec::new();

        let allowed = should_notify(
            &transition("jira", "operational", "maintenance"),
            &mut cooldowns,
            &mut history,
            20,
            300,
            50,
            now,
        );

        assert!(!allowed);
        assert_eq!(cooldowns.get("jira"), Some(&last), "denial must not mutate");
        assert!(history.is_empty());
    }

    #[test]
    fn hourly_cap_counts_across_all_services() {
        let now = Utc::now();
        let mut cooldowns = BTreeMap::new();
        let mut history = Vec::new();

        for service in ["github", "jira"] {
            let allowed = should_notify(
                &transition(service, "operational", "degraded"),
                &mut cooldowns,
                &mut history,
                2,
                300,
                50,
                now,
            );
            assert!(allowed);
        }

        let third = should_notify(
            &transition("okta", "operational", "degraded"),
            &mut cooldowns,
            &mut history,
            2,
            300,
            50,
            now,
        );
        assert!(!third, "third notification within the hour exceeds the cap");
        assert_eq!(history.len(), 2);
        assert!(!cooldowns.contains_key("okta"));
    }

    #[test]
    fn allow_path_records_history_and_cooldown() {
        let now = Utc::now();
        let mut cooldowns = BTreeMap::new();
        let mut history = Vec::new();

        let allowed = should_notify(
            &transition("prisma", "operational", "degraded"),
            &mut cooldowns,
            &mut history,
            20,
            300,
            50,
            now,
        );

        assert!(allowed);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status_change, "operational -> degraded");
        assert_eq!(cooldowns.get("prisma"), Some(&now));
    }

    #[test]
    fn expired_cooldown_allows_again() {
        let now = Utc::now();
        let mut cooldowns = BTreeMap::new();
        cooldowns.insert("aws".to_string(), now - ChronoDuration::seconds(301));
        let mut history = Vec::new();

        let allowed = should_notify(
            &transition("aws", "operational", "degraded"),
            &mut cooldowns,
            &mut history,
            20,
            300,
            50,
            now,
        );
        assert!(allowed);
    }
}
