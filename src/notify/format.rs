use chrono::Utc;
use serde_json::{Value, json};

use crate::config::SlackConfig;
use crate::monitor::Transition;
use crate::status::{CanonicalStatus, Priority, incident_url};

fn status_emoji(status: &CanonicalStatus) -> &'static str {
    match status {
        CanonicalStatus::Operational => ":white_check_mark:",
        CanonicalStatus::Degraded | CanonicalStatus::Investigating => ":warning:",
        CanonicalStatus::MajorOutage => ":red_circle:",
        CanonicalStatus::Maintenance => ":wrench:",
        _ => ":question:",
    }
}

/// Attachment color: the current status decides when it is one of the known
/// states, the service priority breaks ties for opaque statuses.
fn attachment_color(transition: &Transition) -> &'static str {
    match &transition.current_status {
        CanonicalStatus::Operational => "good",
        CanonicalStatus::MajorOutage => "danger",
        CanonicalStatus::Degraded | CanonicalStatus::Investigating => "warning",
        CanonicalStatus::Maintenance => "#439FE0",
        _ => match transition.priority {
            Priority::Critical => "danger",
            Priority::High | Priority::Medium => "warning",
            Priority::Low => "#439FE0",
        },
    }
}

pub(super) fn alert_payload(transition: &Transition, slack: &SlackConfig) -> Value {
    let emoji = status_emoji(&transition.current_status);
    let service_upper = transition.service.to_uppercase();
    let recovered = transition.current_status.is_operational()
        && !transition.previous_status.is_operational();

    let (title, message_text) = if recovered {
        (
            format!("{} Service Restored: {}", emoji, service_upper),
            "Service has returned to operational status".to_string(),
        )
    } else if transition.current_status == CanonicalStatus::Maintenance {
        (
            format!(":wrench: Maintenance: {}", service_upper),
            "Service is under scheduled maintenance".to_string(),
        )
    } else {
        let priority_indicator = if transition.priority == Priority::Critical {
            ":rotating_light: "
        } else {
            ""
        };
        (
            format!("{} {}Service Alert: {}", emoji, priority_indicator, service_upper),
            format!(
                "Status changed: {} -> {}",
                transition.previous_raw, transition.current_raw
            ),
        )
    };

    let mut fields = vec![
        json!({"title": "Service", "value": format!("*{}*", service_upper), "short": true}),
        json!({"title": "Previous Status", "value": transition.previous_raw, "short": true}),
        json!({"title": "Current Status", "value": format!("*{}*", transition.current_raw), "short": true}),
        json!({"title": "Priority", "value": format!("*{}*", transition.priority.title()), "short": true}),
    ];

    if !transition.affected_components.is_empty() {
        fields.push(json!({
            "title": "Affected Components",
            "value": transition.affected_components.join(", "),
            "short": false,
        }));
    }

    let mut attachment = json!({
        "fallback": format!(
            "{}: {} -> {}",
            service_upper, transition.previous_raw, transition.current_raw
        ),
        "color": attachment_color(transition),
        "title": title,
        "text": message_text,
        "fields": fields,
        "footer": "Status Monitor",
        "ts": transition.timestamp.timestamp(),
    });
    if let Some(url) = incident_url(&transition.service) {
        attachment["title_link"] = json!(url);
    }

    json!({
        "channel": slack.channel,
        "username": slack.username,
        "icon_emoji": slack.icon_emoji,
        "text": format!("Status Alert: {}", service_upper),
        "attachments": [attachment]
    })
}

pub(super) fn system_alert_payload(message: &str, slack: &SlackConfig) -> Value {
    json!({
        "channel": slack.channel,
        "username": slack.username,
        "icon_emoji": slack.icon_emoji,
        "text": "Status Monitor System Alert",
        "attachments": [{
            "color": "danger",
            "title": ":rotating_light: Status Monitor System Alert",
            "text": message,
            "footer": "Status Monitor - System Alert",
            "ts": Utc::now().timestamp(),
        }]
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::config::SlackConfig;
    use crate::monitor::Transition;
    use crate::status::{CanonicalStatus, Priority, Severity};

    use super::{alert_payload, attachment_color};

    fn transition(previous: &str, current: &str) -> Transition {
        Transition {
            service: "github".to_string(),
            previous_raw: previous.to_string(),
            current_raw: current.to_string(),
            previous_status: crate::status::normalize_status(previous),
            current_status: crate::status::normalize_status(current),
            priority: Priority::High,
            severity: Severity::Warning,
            affected_components: vec!["API Requests".to_string()],
            incident_id: "github-0".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn recovery_payload_uses_restored_title() {
        let payload = alert_payload(&transition("major_outage", "operational"), &SlackConfig::default());
        let title = payload["attachments"][0]["title"].as_str().unwrap_or_default();
        assert!(title.contains("Service Restored"));
        assert_eq!(payload["attachments"][0]["color"], "good");
    }

    #[test]
    fn outage_payload_is_danger_colored() {
        let t = transition("operational", "major_outage");
        assert_eq!(attachment_color(&t), "danger");
        let payload = alert_payload(&t, &SlackConfig::default());
        assert_eq!(payload["text"], "Status Alert: GITHUB");
    }

    #[test]
    fn known_services_link_to_their_status_page() {
        let payload = alert_payload(&transition("operational", "major_outage"), &SlackConfig::default());
        assert_eq!(
            payload["attachments"][0]["title_link"],
            "https://www.githubstatus.com"
        );
    }

    #[test]
    fn affected_components_become_a_field() {
        let payload = alert_payload(&transition("operational", "maintenance"), &SlackConfig::default());
        let fields = payload["attachments"][0]["fields"].as_array().expect("fields");
        assert!(
            fields
                .iter()
                .any(|field| field["title"] == "Affected Components")
        );
    }
}
