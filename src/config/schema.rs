use serde::Deserialize;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default = "default_slack_channel")]
    pub channel: String,
    #[serde(default = "default_slack_username")]
    pub username: String,
    #[serde(default = "default_slack_icon_emoji")]
    pub icon_emoji: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_max_notifications_per_hour")]
    pub max_notifications_per_hour: u32,
    #[serde(default = "default_confirmation_cycles")]
    pub confirmation_cycles: u32,
    #[serde(default = "default_cycle_timeout_secs")]
    pub cycle_timeout_secs: u64,
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
    #[serde(default = "default_backoff_cap_secs")]
    pub backoff_cap_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_fetch_attempts")]
    pub attempts: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_azure_status_path")]
    pub azure_status_path: String,
    #[serde(default = "default_aws_status_path")]
    pub aws_status_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_state_path")]
    pub path: String,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}
