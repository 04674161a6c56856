use super::schema::{FetchConfig, MonitorConfig, SlackConfig, SourcesConfig, StateConfig};

pub(super) fn default_slack_channel() -> String {
    "#status-alerts".to_string()
}

pub(super) fn default_slack_username() -> String {
    "StatusBot".to_string()
}

pub(super) fn default_slack_icon_emoji() -> String {
    ":warning:".to_string()
}

pub(super) fn default_interval_secs() -> u64 {
    120
}

pub(super) fn default_cooldown_secs() -> u64 {
    300
}

pub(super) fn default_max_notifications_per_hour() -> u32 {
    20
}

pub(super) fn default_confirmation_cycles() -> u32 {
    1
}

pub(super) fn default_cycle_timeout_secs() -> u64 {
    120
}

pub(super) fn default_max_consecutive_errors() -> u32 {
    5
}

pub(super) fn default_backoff_cap_secs() -> u64 {
    1800
}

pub(super) fn default_request_timeout_secs() -> u64 {
    30
}

pub(super) fn default_fetch_attempts() -> u32 {
    2
}

pub(super) fn default_azure_status_path() -> String {
    "azure_status_structured.json".to_string()
}

pub(super) fn default_aws_status_path() -> String {
    "aws_services_live.json".to_string()
}

pub(super) fn default_state_path() -> String {
    "data/monitoring_state.json".to_string()
}

pub(super) fn default_history_limit() -> usize {
    50
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            channel: default_slack_channel(),
            username: default_slack_username(),
            icon_emoji: default_slack_icon_emoji(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cooldown_secs: default_cooldown_secs(),
            max_notifications_per_hour: default_max_notifications_per_hour(),
            confirmation_cycles: default_confirmation_cycles(),
            cycle_timeout_secs: default_cycle_timeout_secs(),
            max_consecutive_errors: default_max_consecutive_errors(),
            backoff_cap_secs: default_backoff_cap_secs(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            attempts: default_fetch_attempts(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            azure_status_path: default_azure_status_path(),
            aws_status_path: default_aws_status_path(),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
            history_limit: default_history_limit(),
        }
    }
}
