//! Realtime subsystem configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Realtime (WebSocket) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// Interval between server-initiated keep-alive pings on the
    /// notifications channel, in seconds. Keeps idle sockets from being
    /// reclaimed by intermediary proxies.
    #[serde(default = "default_keepalive_interval_secs")]
    pub keepalive_interval_secs: u64,
}

impl RealtimeConfig {
    /// Keep-alive interval as a `Duration`.
    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }

    /// Validate realtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.keepalive_interval_secs < 5 {
            return Err(ValidationError::KeepaliveTooShort);
        }
        Ok(())
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            keepalive_interval_secs: default_keepalive_interval_secs(),
        }
    }
}

fn default_keepalive_interval_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RealtimeConfig::default().validate().is_ok());
    }

    #[test]
    fn keepalive_below_five_seconds_is_rejected() {
        let config = RealtimeConfig {
            keepalive_interval_secs: 1,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn keepalive_interval_converts_to_duration() {
        let config = RealtimeConfig::default();
        assert_eq!(config.keepalive_interval(), Duration::from_secs(30));
    }
}
