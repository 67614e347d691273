//! Extension to read the session store settings from pmoconfig

use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::{Number, Value};
use std::time::Duration;

use crate::store::{DEFAULT_POLL_INTERVAL, StoreOptions};

const POLL_INTERVAL_PATH: &[&str] = &["nowplaying", "poll_interval_ms"];

/// Extension trait adding session store settings to `pmoconfig::Config`
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmonowplaying::NowPlayingConfigExt;
///
/// let config = get_config()?;
/// let options = config.store_options()?;
/// ```
pub trait NowPlayingConfigExt {
    /// Delay between two poll cycles in milliseconds (default: 1000)
    fn get_poll_interval_ms(&self) -> Result<u64>;

    fn set_poll_interval_ms(&self, interval_ms: u64) -> Result<()>;

    /// Store options built from the configuration
    fn store_options(&self) -> Result<StoreOptions>;
}

impl NowPlayingConfigExt for Config {
    fn get_poll_interval_ms(&self) -> Result<u64> {
        match self.get_value(POLL_INTERVAL_PATH) {
            Ok(Value::Number(n)) => Ok(n
                .as_u64()
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_POLL_INTERVAL.as_millis() as u64)),
            _ => Ok(DEFAULT_POLL_INTERVAL.as_millis() as u64),
        }
    }

    fn set_poll_interval_ms(&self, interval_ms: u64) -> Result<()> {
        self.set_value(POLL_INTERVAL_PATH, Value::Number(Number::from(interval_ms)))
    }

    fn store_options(&self) -> Result<StoreOptions> {
        Ok(StoreOptions {
            poll_interval: Duration::from_millis(self.get_poll_interval_ms()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_interval() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.get_poll_interval_ms().unwrap(), 1000);

        config.set_poll_interval_ms(250).unwrap();
        assert_eq!(
            config.store_options().unwrap().poll_interval,
            Duration::from_millis(250)
        );

        // A zero interval would make the loop spin
        config.set_poll_interval_ms(0).unwrap();
        assert_eq!(config.get_poll_interval_ms().unwrap(), 1000);
    }
}
