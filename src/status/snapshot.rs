use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One component (or region) inside a service's breakdown, already flattened
/// into a uniform shape at the source boundary. Vendor pages disagree on
/// whether components arrive as a mapping or a sequence; nothing past the
/// source layer branches on that again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub status: String,
}

impl Component {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Green,
    Orange,
    Red,
}

/// Everything one polling cycle produced: per-service headline status,
/// per-service component breakdown, dashboard colors, and the capture instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub details: BTreeMap<String, String>,
    pub components: BTreeMap<String, Vec<Component>>,
    pub status_colors: BTreeMap<String, StatusColor>,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            details: BTreeMap::new(),
            components: BTreeMap::new(),
            status_colors: BTreeMap::new(),
            timestamp,
        }
    }

    /// Record one service's collected result in a single step so the three
    /// maps cannot drift apart.
    pub fn record_service(
        &mut self,
        service: &str,
        label: impl Into<String>,
        color: StatusColor,
        components: Vec<Component>,
    ) {
        self.details.insert(service.to_string(), label.into());
        self.status_colors.insert(service.to_string(), color);
        self.components.insert(service.to_string(), components);
    }
}

/// Dashboard color from the number of red (non-operational) entries a service
/// reported: zero is green, one or two is orange, more is red.
pub fn aggregate_color(red_issue_count: usize) -> StatusColor {
    match red_issue_count {
        0 => StatusColor::Green,
        1 | 2 => StatusColor::Orange,
        _ => StatusColor::Red,
    }
}

pub fn aggregate_label(red_issue_count: usize) -> &'static str {
    match red_issue_count {
        0 => "OPERATIONAL",
        1 | 2 => "MINOR ISSUE",
        _ => "DEGRADED",
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{Component, Snapshot, StatusColor, aggregate_color, aggregate_label};

    #[test]
    fn aggregate_color_and_label_track_red_count() {
        assert_eq!(aggregate_color(0), StatusColor::Green);
        assert_eq!(aggregate_color(2), StatusColor::Orange);
        assert_eq!(aggregate_color(3), StatusColor::Red);
        assert_eq!(aggregate_label(0), "OPERATIONAL");
        assert_eq!(aggregate_label(1), "MINOR ISSUE");
        assert_eq!(aggregate_label(5), "DEGRADED");
    }

    #[test]
    fn record_service_keeps_the_three_maps_aligned() {
        let mut snapshot = Snapshot::at(Utc::now());
        snapshot.record_service(
            "github",
            "OPERATIONAL",
            StatusColor::Green,
            vec![Component::new("API Requests", "operational")],
        );

        assert_eq!(snapshot.details.get("github").map(String::as_str), Some("OPERATIONAL"));
        assert_eq!(snapshot.status_colors.get("github"), Some(&StatusColor::Green));
        assert_eq!(snapshot.components.get("github").map(Vec::len), Some(1));
    }
}
