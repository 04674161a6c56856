use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

use crate::{config::Config, monitor::MonitorState};

#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub monitor_state: Arc<Mutex<MonitorState>>,
    pub shutdown: Arc<Notify>,
}

impl AppContext {
    pub fn new(config: Config, monitor_state: MonitorState) -> Self {
        Self {
            config,
            monitor_state: Arc::new(Mutex::new(monitor_state)),
            shutdown: Arc::new(Notify::new()),
        }
    }
}
