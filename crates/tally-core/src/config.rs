use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// How far ahead of "now" series are eagerly generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub months: u32,
}

impl Horizon {
    /// Used right after a template is created or its rule is edited.
    pub const CREATION: Horizon = Horizon { months: 12 };
    /// Used by the background renewal runs.
    pub const RENEWAL: Horizon = Horizon { months: 36 };

    pub fn months(months: u32) -> Self {
        Self { months }
    }

    /// The inclusive target date this horizon reaches from `now`.
    pub fn target_from(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, CoreError> {
        now.checked_add_months(Months::new(self.months))
            .ok_or_else(|| {
                CoreError::DateOutOfRange(format!(
                    "{} plus a {} month horizon",
                    now.to_rfc3339(),
                    self.months
                ))
            })
    }
}

/// Timing of the background renewal process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenewalConfig {
    /// Delay before the first run after startup
    pub startup_delay_secs: u64,
    /// Period between runs
    pub interval_secs: u64,
    pub horizon: Horizon,
}

impl Default for RenewalConfig {
    fn default() -> Self {
        Self {
            startup_delay_secs: 2,
            interval_secs: 24 * 60 * 60,
            horizon: Horizon::RENEWAL,
        }
    }
}

impl RenewalConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interval_secs == 0 {
            return Err(CoreError::InvalidInput(
                "renewal interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub creation_horizon: Horizon,
    pub renewal: RenewalConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            creation_horizon: Horizon::CREATION,
            renewal: RenewalConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_support::at;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.creation_horizon, Horizon::months(12));
        assert_eq!(config.renewal.horizon, Horizon::months(36));
        assert_eq!(config.renewal.startup_delay(), Duration::from_secs(2));
        assert_eq!(config.renewal.interval(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_creation_and_renewal_horizons_differ() {
        // Two presets exist for what is conceptually one setting; they are
        // kept distinct on purpose and both stay configurable.
        assert_ne!(Horizon::CREATION, Horizon::RENEWAL);
        let now = at("2024-01-15");
        assert_eq!(Horizon::CREATION.target_from(now).unwrap(), at("2025-01-15"));
        assert_eq!(Horizon::RENEWAL.target_from(now).unwrap(), at("2027-01-15"));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let config = RenewalConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::InvalidInput(_))));
    }
}
