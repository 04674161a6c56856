mod canonical;
mod registry;
mod snapshot;

pub use canonical::{CanonicalStatus, Severity, normalize_status};
pub use registry::{MONITORED_SERVICES, Priority, incident_url, service_priority};
pub use snapshot::{Component, Snapshot, StatusColor, aggregate_color, aggregate_label};
