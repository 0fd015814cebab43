use serde::Deserialize;
use std::time::Duration;

/// Settings for the periodic maintenance task.
#[derive(Debug, Deserialize)]
pub struct Maintenance {
    /// Activity records older than this amount of days are purged.
    ///
    /// **Environment variables**:
    /// - `FOODIE_MAINTENANCE_ACTIVITY_RETENTION_DAYS`
    #[serde(default = "Maintenance::default_activity_retention_days")]
    pub activity_retention_days: u32,

    /// How often the maintenance task runs. `0` disables it.
    ///
    /// **Environment variables**:
    /// - `FOODIE_MAINTENANCE_INTERVAL_SECS`
    #[serde(default = "Maintenance::default_interval_secs")]
    pub interval_secs: u64,
}

impl Maintenance {
    /// Upper bound for `activity_retention_days`, about a thousand years.
    pub const MAX_RETENTION_DAYS: u32 = 365_000;

    #[must_use]
    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }

    const fn default_activity_retention_days() -> u32 {
        90
    }

    const fn default_interval_secs() -> u64 {
        60 * 60 * 24
    }
}

impl Default for Maintenance {
    fn default() -> Self {
        Self {
            activity_retention_days: Self::default_activity_retention_days(),
            interval_secs: Self::default_interval_secs(),
        }
    }
}
