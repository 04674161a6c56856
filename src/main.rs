mod app_context;
mod config;
mod jobs;
mod monitor;
mod notify;
mod source;
mod state_store;
mod status;

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::app_context::AppContext;
use crate::config::{Config, load_config};
use crate::jobs::start_background_jobs;
use crate::state_store::{load_state, restore_monitor_state};
use crate::status::MONITORED_SERVICES;

fn init_json_logging() {
    if let Err(error) = tracing_log::LogTracer::init() {
        eprintln!(
            "logging bridge initialization failed (continuing with existing logger): {}",
            error
        );
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .with_current_span(false)
        .with_span_list(false)
        .finish();

    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("global logger initialization failed: {}", error);
    }
}

const CONFIG_PATH: &str = "config.toml";

fn log_startup_summary(config: &Config) {
    if config.slack.webhook_url.is_some() {
        log::info!("slack_notifications_enabled channel={}", config.slack.channel);
    } else {
        log::warn!("slack_notifications_disabled reason=webhook_url_unset");
    }

    log::info!(
        "monitor_settings interval_secs={} confirmation_cycles={} cooldown_secs={} max_notifications_per_hour={}",
        config.monitor.interval_secs,
        config.monitor.confirmation_cycles,
        config.monitor.cooldown_secs,
        config.monitor.max_notifications_per_hour
    );
    log::info!(
        "monitored_services count={} services={}",
        MONITORED_SERVICES.len(),
        MONITORED_SERVICES.join(",")
    );
}

// Main
#[tokio::main]
async fn main() {
    init_json_logging();

    let config: Config = match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(error) => {
            log::error!("Configuration error: {}", error);
            return;
        }
    };

    log::info!("Status monitor is starting...");
    log_startup_summary(&config);

    let persisted = load_state(Path::new(&config.state.path));
    let monitor_state = restore_monitor_state(persisted, config.state.history_limit);

    let app_context = AppContext::new(config, monitor_state);
    let monitor_job = start_background_jobs(app_context.clone());

    if let Err(error) = tokio::signal::ctrl_c().await {
        log::error!("signal_listener_failed error={}", error);
    }
    log::info!("shutdown_signal_received");
    app_context.shutdown.notify_one();

    if let Err(error) = monitor_job.await {
        log::error!("monitor_job_join_failed error={}", error);
    }
    log::info!("Status monitor stopped.");
}
