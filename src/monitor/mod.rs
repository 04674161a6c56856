mod detector;
mod gate;
mod service;
mod state;

pub use detector::{Transition, detect_changes};
pub use gate::should_notify;
pub use service::{CycleError, CycleReport, force_check, latest_snapshot, monitor_report, run_status_cycle};
pub use state::{
    MonitorReport, MonitorState, NotificationRecord, PendingChange, PendingChangeView,
    notifications_within, pending_key, record_notification,
};
