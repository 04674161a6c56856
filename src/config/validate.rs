use thiserror::Error;

use super::schema::Config;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Validation(String),
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.monitor.cooldown_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.cooldown_secs must be greater than 0".to_string(),
            ));
        }
        if self.monitor.max_notifications_per_hour == 0 {
            return Err(ConfigError::Validation(
                "monitor.max_notifications_per_hour must be greater than 0".to_string(),
            ));
        }
        if self.monitor.confirmation_cycles == 0 {
            return Err(ConfigError::Validation(
                "monitor.confirmation_cycles must be at least 1".to_string(),
            ));
        }
        if self.monitor.cycle_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "monitor.cycle_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.monitor.max_consecutive_errors == 0 {
            return Err(ConfigError::Validation(
                "monitor.max_consecutive_errors must be greater than 0".to_string(),
            ));
        }
        if self.monitor.backoff_cap_secs < self.monitor.interval_secs {
            return Err(ConfigError::Validation(
                "monitor.backoff_cap_secs must not be smaller than monitor.interval_secs"
                    .to_string(),
            ));
        }
        if self.fetch.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.fetch.attempts == 0 {
            return Err(ConfigError::Validation(
                "fetch.attempts must be at least 1".to_string(),
            ));
        }
        if self.slack.channel.trim().is_empty() {
            return Err(ConfigError::Validation(
                "slack.channel must not be empty".to_string(),
            ));
        }
        if let Some(url) = &self.slack.webhook_url
            && url.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "slack.webhook_url must not be empty when set".to_string(),
            ));
        }
        if self.state.path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "state.path must not be empty".to_string(),
            ));
        }
        if self.state.history_limit == 0 {
            return Err(ConfigError::Validation(
                "state.history_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;

    #[test]
    fn default_config_validates() {
        let config = Config::default();
        config.validate().expect("defaults should be valid");
    }

    #[test]
    fn zero_confirmation_cycles_is_rejected() {
        let mut config = Config::default();
        config.monitor.confirmation_cycles = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn backoff_cap_below_interval_is_rejected() {
        let mut config = Config::default();
        config.monitor.interval_secs = 600;
        config.monitor.backoff_cap_secs = 300;
        assert!(config.validate().is_err());
    }
}
