use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical vocabulary every vendor status string is folded into.
///
/// Unrecognized non-empty strings are kept as `Other` with the lower-cased
/// trimmed text, so two different unmapped vendor phrases stay distinguishable
/// to the change detector instead of collapsing into one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    Operational,
    Degraded,
    MajorOutage,
    Maintenance,
    Investigating,
    Unknown,
    Other(String),
}

impl CanonicalStatus {
    pub fn is_operational(&self) -> bool {
        matches!(self, CanonicalStatus::Operational)
    }

    pub fn is_disruption(&self) -> bool {
        matches!(
            self,
            CanonicalStatus::MajorOutage | CanonicalStatus::Degraded
        )
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalStatus::Operational => write!(f, "operational"),
            CanonicalStatus::Degraded => write!(f, "degraded"),
            CanonicalStatus::MajorOutage => write!(f, "major_outage"),
            CanonicalStatus::Maintenance => write!(f, "maintenance"),
            CanonicalStatus::Investigating => write!(f, "investigating"),
            CanonicalStatus::Unknown => write!(f, "unknown"),
            CanonicalStatus::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Total normalization. Never fails: empty input maps to `Unknown`, anything
/// the table does not know passes through lower-cased as an opaque status.
pub fn normalize_status(raw: &str) -> CanonicalStatus {
    let status = raw.trim().to_lowercase();
    if status.is_empty() {
        return CanonicalStatus::Unknown;
    }

    match status.as_str() {
        "operational" | "available" | "normal" | "ok" | "green" | "up" => {
            CanonicalStatus::Operational
        }
        "degraded performance" | "degraded_performance" | "degraded" | "partial_outage"
        | "partial outage" | "minor issue" | "minor_issue" => CanonicalStatus::Degraded,
        "major_outage" | "major outage" | "down" | "red" | "critical" | "outage" | "error" => {
            CanonicalStatus::MajorOutage
        }
        "maintenance" | "scheduled maintenance" | "under_maintenance" => {
            CanonicalStatus::Maintenance
        }
        "investigating" | "identified" | "monitoring" => CanonicalStatus::Investigating,
        "unknown" => CanonicalStatus::Unknown,
        _ => CanonicalStatus::Other(status),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Resolved,
    Critical,
    Warning,
    Info,
}

impl Severity {
    pub fn from_status(status: &CanonicalStatus) -> Self {
        match status {
            CanonicalStatus::Operational => Severity::Resolved,
            CanonicalStatus::MajorOutage => Severity::Critical,
            CanonicalStatus::Degraded | CanonicalStatus::Investigating => Severity::Warning,
            CanonicalStatus::Maintenance => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Resolved => write!(f, "resolved"),
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}
