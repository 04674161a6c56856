use std::fmt;

/// Fixed registry of monitored services. Detection walks this list in order,
/// which also fixes the emission order of transitions within a cycle.
pub const MONITORED_SERVICES: [&str; 10] = [
    "github",
    "datadog",
    "jira",
    "jsm",
    "prisma",
    "grafana",
    "okta",
    "cleverbridge",
    "azure",
    "aws",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn title(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Static per-service alert priority. Services outside the table get `Medium`.
pub fn service_priority(service: &str) -> Priority {
    match service {
        "datadog" | "okta" | "azure" | "aws" => Priority::Critical,
        "github" | "jsm" | "prisma" => Priority::High,
        "jira" | "grafana" => Priority::Medium,
        "cleverbridge" => Priority::Low,
        _ => Priority::Medium,
    }
}

pub fn incident_url(service: &str) -> Option<&'static str> {
    match service {
        "github" => Some("https://www.githubstatus.com"),
        "datadog" => Some("https://status.datadoghq.com"),
        "jira" => Some("https://jira-software.status.atlassian.com"),
        "jsm" => Some("https://jira-service-management.status.atlassian.com"),
        "prisma" => Some("https://www.prisma-status.com"),
        "grafana" => Some("https://status.grafana.com"),
        "okta" => Some("https://status.okta.com"),
        "cleverbridge" => Some("https://status.cleverbridge.com"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{MONITORED_SERVICES, Priority, service_priority};

    #[test]
    fn unlisted_service_defaults_to_medium_priority() {
        assert_eq!(service_priority("something-new"), Priority::Medium);
    }

    #[test]
    fn every_registry_entry_has_a_priority() {
        for service in MONITORED_SERVICES {
            // The table must never panic for registry members.
            let _ = service_priority(service);
        }
        assert_eq!(service_priority("aws"), Priority::Critical);
        assert_eq!(service_priority("cleverbridge"), Priority::Low);
    }
}
