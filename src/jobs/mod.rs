use tokio::task::JoinHandle;

use crate::app_context::AppContext;

mod monitor;

pub fn start_background_jobs(app_context: AppContext) -> JoinHandle<()> {
    monitor::start_monitor_job(app_context)
}
