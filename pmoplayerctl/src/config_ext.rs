//! Extension to read the playerctl bridge settings from pmoconfig
//!
//! ```rust,ignore
//! use pmoconfig::get_config;
//! use pmoplayerctl::PlayerctlConfigExt;
//!
//! let config = get_config()?;
//! let client = config.create_playerctl_client()?;
//! ```

use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::{Number, Value};
use std::time::Duration;

use crate::client::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS, PlayerctlClient};

const BASE_URL_PATH: &[&str] = &["playerctl", "base_url"];
const TIMEOUT_PATH: &[&str] = &["playerctl", "timeout_ms"];

/// Extension trait adding playerctl bridge settings to `pmoconfig::Config`
pub trait PlayerctlConfigExt {
    /// Bridge base URL (default: `http://127.0.0.1:6767`)
    fn get_playerctl_base_url(&self) -> Result<String>;

    fn set_playerctl_base_url(&self, url: String) -> Result<()>;

    /// Per-request timeout in milliseconds (default: 5000)
    fn get_playerctl_timeout_ms(&self) -> Result<u64>;

    fn set_playerctl_timeout_ms(&self, timeout_ms: u64) -> Result<()>;

    /// Builds a client from the configured address and timeout
    fn create_playerctl_client(&self) -> Result<PlayerctlClient>;
}

impl PlayerctlConfigExt for Config {
    fn get_playerctl_base_url(&self) -> Result<String> {
        match self.get_value(BASE_URL_PATH) {
            Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
            _ => Ok(DEFAULT_BASE_URL.to_string()),
        }
    }

    fn set_playerctl_base_url(&self, url: String) -> Result<()> {
        self.set_value(BASE_URL_PATH, Value::String(url))
    }

    fn get_playerctl_timeout_ms(&self) -> Result<u64> {
        let default = DEFAULT_REQUEST_TIMEOUT_SECS * 1000;
        match self.get_value(TIMEOUT_PATH) {
            // A zero timeout would fail every request
            Ok(Value::Number(n)) => Ok(n.as_u64().filter(|ms| *ms > 0).unwrap_or(default)),
            _ => Ok(default),
        }
    }

    fn set_playerctl_timeout_ms(&self, timeout_ms: u64) -> Result<()> {
        self.set_value(TIMEOUT_PATH, Value::Number(Number::from(timeout_ms)))
    }

    fn create_playerctl_client(&self) -> Result<PlayerctlClient> {
        let client = PlayerctlClient::builder()
            .base_url(self.get_playerctl_base_url()?)
            .timeout(Duration::from_millis(self.get_playerctl_timeout_ms()?))
            .build()?;
        Ok(client)
    }
}
