mod core;
mod query;

pub use self::core::{CycleError, CycleReport, run_status_cycle};
pub use query::{force_check, latest_snapshot, monitor_report};
