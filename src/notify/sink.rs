use std::time::Duration;

use crate::config::{Config, SlackConfig};
use crate::monitor::Transition;

use super::format::{alert_payload, system_alert_payload};

const WEBHOOK_TIMEOUT_SECS: u64 = 30;

/// Outbound alert channel. Implementations report delivery as a boolean and
/// never raise, so the caller's gate bookkeeping stays committed regardless
/// of delivery outcome.
pub trait NotificationSink {
    async fn send_alert(&self, transition: &Transition) -> bool;
    async fn send_system_alert(&self, message: &str) -> bool;
}

pub struct SlackWebhookSink {
    client: reqwest::Client,
    webhook_url: Option<String>,
    slack: SlackConfig,
}

impl SlackWebhookSink {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            webhook_url: config.slack.webhook_url.clone(),
            slack: config.slack.clone(),
        }
    }

    async fn post_payload(&self, payload: &serde_json::Value, kind: &str) -> bool {
        let Some(url) = &self.webhook_url else {
            log::warn!("notification_skipped kind={} reason=webhook_not_configured", kind);
            return false;
        };

        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                log::error!(
                    "notification_delivery_failed kind={} status={}",
                    kind,
                    response.status()
                );
                false
            }
            Err(error) => {
                log::error!("notification_delivery_failed kind={} error={}", kind, error);
                false
            }
        }
    }
}

impl NotificationSink for SlackWebhookSink {
    async fn send_alert(&self, transition: &Transition) -> bool {
        log::info!(
            "notification_sending service={} change={} -> {}",
            transition.service,
            transition.previous_raw,
            transition.current_raw
        );
        let payload = alert_payload(transition, &self.slack);
        self.post_payload(&payload, "alert").await
    }

    async fn send_system_alert(&self, message: &str) -> bool {
        let payload = system_alert_payload(message, &self.slack);
        self.post_payload(&payload, "system_alert").await
    }
}

#[cfg(test)]
pub struct MockNotificationSink {
    pub deliveries: std::sync::Mutex<Vec<String>>,
    pub system_alerts: std::sync::Mutex<Vec<String>>,
    pub deliver_ok: bool,
}

#[cfg(test)]
impl MockNotificationSink {
    pub fn new(deliver_ok: bool) -> Self {
        Self {
            deliveries: std::sync::Mutex::new(Vec::new()),
            system_alerts: std::sync::Mutex::new(Vec::new()),
            deliver_ok,
        }
    }
}

#[cfg(test)]
impl NotificationSink for MockNotificationSink {
    async fn send_alert(&self, transition: &Transition) -> bool {
        self.deliveries
            .lock()
            .expect("mock sink lock")
            .push(transition.service.clone());
        self.deliver_ok
    }

    async fn send_system_alert(&self, message: &str) -> bool {
        self.system_alerts
            .lock()
            .expect("mock sink lock")
            .push(message.to_string());
        self.deliver_ok
    }
}
