use std::path::PathBuf;

use tokio::signal::unix::{Signal, SignalKind, signal};
use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};

use crate::app_context::AppContext;
use crate::monitor::{force_check, latest_snapshot, monitor_report, run_status_cycle};
use crate::notify::{NotificationSink, SlackWebhookSink};
use crate::source::HttpSnapshotSource;
use crate::state_store::save_state;

const MAX_BACKOFF_DOUBLINGS: u32 = 10;

pub(super) fn start_monitor_job(app_context: AppContext) -> JoinHandle<()> {
    tokio::spawn(async move {
        let config = app_context.config.clone();
        let state_path = PathBuf::from(&config.state.path);
        let mut source = HttpSnapshotSource::from_config(&config);
        let sink = SlackWebhookSink::from_config(&config);

        // SIGUSR1 is the operator's "check now and report" trigger.
        let mut force_signal = match signal(SignalKind::user_defined1()) {
            Ok(stream) => Some(stream),
            Err(error) => {
                log::warn!("force_check_signal_unavailable error={}", error);
                None
            }
        };

        {
            let mut state = app_context.monitor_state.lock().await;
            state.active = true;
        }

        log::info!(
            "monitor_loop_started interval_secs={} confirmation_cycles={}",
            config.monitor.interval_secs,
            config.monitor.confirmation_cycles
        );

        loop {
            match run_status_cycle(&config, &app_context.monitor_state, &mut source, &sink).await {
                Ok(_) => {
                    let mut state = app_context.monitor_state.lock().await;
                    state.consecutive_errors = 0;
                    state.last_error = None;

                    if let Err(error) = save_state(&state_path, &state) {
                        log::warn!("state_save_failed error={}", error);
                    }
                }
                Err(error) => {
                    let errors = {
                        let mut state = app_context.monitor_state.lock().await;
                        state.consecutive_errors += 1;
                        state.last_error = Some(error.to_string());
                        state.consecutive_errors
                    };
                    log::error!(
                        "cycle_failed consecutive_errors={} error={}",
                        errors,
                        error
                    );

                    if errors >= config.monitor.max_consecutive_errors {
                        let message = format!(
                            "Monitoring system experiencing issues: {} consecutive failed cycles (last error: {})",
                            errors, error
                        );
                        if !sink.send_system_alert(&message).await {
                            log::warn!("system_alert_failed consecutive_errors={}", errors);
                        }
                        let mut state = app_context.monitor_state.lock().await;
                        state.consecutive_errors = 0;
                    }
                }
            }

            let errors = {
                let state = app_context.monitor_state.lock().await;
                state.consecutive_errors
            };
            let sleep_secs = if errors > 0 {
                let doublings = errors.min(MAX_BACKOFF_DOUBLINGS);
                let backed_off = config
                    .monitor
                    .interval_secs
                    .saturating_mul(1u64 << doublings);
                let capped = backed_off.min(config.monitor.backoff_cap_secs);
                log::warn!(
                    "monitor_backoff consecutive_errors={} sleep_secs={}",
                    errors,
                    capped
                );
                capped
            } else {
                config.monitor.interval_secs
            };

            tokio::select! {
                _ = sleep(Duration::from_secs(sleep_secs)) => {}
                _ = wait_force_signal(&mut force_signal) => {
                    run_forced_check(&app_context, &mut source, &sink, &state_path).await;
                }
                _ = app_context.shutdown.notified() => {
                    log::info!("monitor_loop_stopping reason=shutdown");
                    let mut state = app_context.monitor_state.lock().await;
                    state.active = false;
                    if let Err(error) = save_state(&state_path, &state) {
                        log::warn!("state_save_failed error={}", error);
                    }
                    break;
                }
            }
        }
    })
}

async fn wait_force_signal(force_signal: &mut Option<Signal>) {
    match force_signal {
        Some(stream) => {
            stream.recv().await;
        }
        None => std::future::pending().await,
    }
}

async fn run_forced_check(
    app_context: &AppContext,
    source: &mut HttpSnapshotSource,
    sink: &SlackWebhookSink,
    state_path: &std::path::Path,
) {
    let config = &app_context.config;

    match force_check(config, &app_context.monitor_state, source, sink).await {
        Ok(_) => {
            let state = app_context.monitor_state.lock().await;
            if let Err(error) = save_state(state_path, &state) {
                log::warn!("state_save_failed error={}", error);
            }
        }
        Err(error) => log::error!("force_check_failed error={}", error),
    }

    let report = monitor_report(
        &app_context.monitor_state,
        config.monitor.confirmation_cycles,
    )
    .await;
    match serde_json::to_string(&report) {
        Ok(encoded) => log::info!("monitor_report {}", encoded),
        Err(error) => log::warn!("monitor_report_encode_failed error={}", error),
    }

    if let Some(snapshot) = latest_snapshot(&app_context.monitor_state).await {
        for (service, status) in &snapshot.details {
            log::info!("service_status service={} status={}", service, status);
        }
    }
}
