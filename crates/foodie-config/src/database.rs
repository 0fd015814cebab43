use foodie_utils::Sensitive;
use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use std::time::Duration;

/// Configuration for connecting to the SQLite database.
#[derive(Debug, Deserialize)]
pub struct Database {
    /// Connection URL of the database, for example
    /// `sqlite://amaderfoodie.db` or `sqlite::memory:`.
    ///
    /// **Environment variables**:
    /// - `FOODIE_DATABASE_URL` or `DATABASE_URL`
    pub url: Sensitive<String>,

    /// Maximum amount of connections the pool can hold.
    ///
    /// **Environment variables**:
    /// - `FOODIE_DATABASE_MAX_CONNECTIONS`
    #[serde(default = "Database::default_max_connections")]
    pub max_connections: NonZeroU32,

    /// Minimum idle connections kept alive by the pool.
    ///
    /// **Environment variables**:
    /// - `FOODIE_DATABASE_MIN_CONNECTIONS`
    #[serde(default)]
    pub min_connections: Option<u32>,

    /// How long the server waits for a connection to be
    /// acquired before giving up.
    ///
    /// **Environment variables**:
    /// - `FOODIE_DATABASE_TIMEOUT_SECS`
    #[serde(default = "Database::default_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

impl Database {
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_TIMEOUT_SECS: u64 = 5;

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.get())
    }

    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            url: Sensitive::new("sqlite::memory:".into()),
            max_connections: NonZeroU32::MIN,
            min_connections: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }

    // Required by serde
    const fn default_max_connections() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_MAX_CONNECTIONS) {
            Some(n) => n,
            None => panic!("DEFAULT_MAX_CONNECTIONS is accidentally set to 0"),
        }
    }

    const fn default_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_TIMEOUT_SECS is accidentally set to 0"),
        }
    }
}
