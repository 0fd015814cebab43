use figment::providers::{Env, Format, Toml};
use figment::Figment;
use foodie_error::ext::ResultExt;
use foodie_error::{Error, Result};
use foodie_utils::env;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

use crate::{vars, Auth, Database, Logging, Maintenance};

#[derive(Debug, Deserialize)]
pub struct Server {
    /// **Environment variable**: `FOODIE_IP`
    ///
    /// The default value is `127.0.0.1`.
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,

    /// **Environment variable**: `FOODIE_PORT`
    ///
    /// The default value is `8080` if not set.
    #[serde(default = "Server::default_port")]
    pub port: u16,

    /// **Environment variable**: `FOODIE_WORKERS`
    ///
    /// Total amount of workers the server will run. Defaults to the
    /// amount of available cores, capped at `4`.
    #[serde(default = "Server::default_workers")]
    pub workers: NonZeroUsize,

    /// You can refer `database` field as `db` to make it easier to type.
    #[serde(alias = "db")]
    pub database: Database,

    #[serde(default)]
    pub logging: Logging,

    pub auth: Auth,

    #[serde(default)]
    pub maintenance: Maintenance,
}

#[derive(Debug, Error)]
#[error("Could not load server configuration")]
pub struct LoadConfigError;

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "amaderfoodie.toml";

    /// Loads the server configuration from the config file (if it exists)
    /// and the program's environment variables.
    ///
    /// Environment variables take priority over values from the file.
    pub fn load() -> Result<Self, LoadConfigError> {
        let path = env::var_opt(vars::SERVER_CONFIG_FILE)
            .change_context(LoadConfigError)?
            .map_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILE), PathBuf::from);

        let config = Self::figment(path).extract::<Self>().map_err(|e| {
            crate::figment_ext::attach_figment_error(Error::unknown(LoadConfigError), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Loads the server test configuration.
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: 0,
            workers: NonZeroUsize::MIN,
            database: Database::for_tests(),
            logging: Logging::default(),
            auth: Auth::for_tests(),
            maintenance: Maintenance::default(),
        }
    }

    pub(crate) fn figment(path: PathBuf) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            // figment's env provider splits on underscores poorly for
            // fields that have underscores in them.
            .merge(Env::prefixed("FOODIE_").map(|key| {
                match key.as_str().to_ascii_lowercase().as_str() {
                    "database_url" => "database.url".into(),
                    "database_max_connections" => "database.max_connections".into(),
                    "database_min_connections" => "database.min_connections".into(),
                    "database_timeout_secs" => "database.timeout_secs".into(),

                    "logging_style" => "logging.style".into(),
                    "logging_targets" => "logging.targets".into(),

                    "auth_jwt_secret" => "auth.jwt_secret".into(),
                    "auth_token_lifetime_hours" => "auth.token_lifetime_hours".into(),

                    "maintenance_activity_retention_days" => {
                        "maintenance.activity_retention_days".into()
                    }
                    "maintenance_interval_secs" => "maintenance.interval_secs".into(),

                    other => other.to_string().into(),
                }
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "JWT_SECRET"])
                    .map(|key| match key.as_str() {
                        "DATABASE_URL" => "database.url".into(),
                        "JWT_SECRET" => "auth.jwt_secret".into(),
                        other => other.to_string().into(),
                    }),
            )
    }

    fn validate(&self) -> Result<(), LoadConfigError> {
        if self.auth.jwt_secret.as_str().len() < Auth::MIN_SECRET_LEN {
            return Err(Error::unknown(LoadConfigError).attach_printable(format!(
                "auth.jwt_secret must be at least {} characters long",
                Auth::MIN_SECRET_LEN
            )));
        }

        if self.database.url.as_str().trim().is_empty() {
            return Err(Error::unknown(LoadConfigError)
                .attach_printable("database.url must not be empty"));
        }

        if let Some(min) = self.database.min_connections {
            if min > self.database.max_connections.get() {
                return Err(Error::unknown(LoadConfigError).attach_printable(
                    "database.min_connections must not exceed database.max_connections",
                ));
            }
        }

        if self.maintenance.activity_retention_days > Maintenance::MAX_RETENTION_DAYS {
            return Err(Error::unknown(LoadConfigError).attach_printable(format!(
                "maintenance.activity_retention_days must not exceed {}",
                Maintenance::MAX_RETENTION_DAYS
            )));
        }

        Ok(())
    }

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        8080
    }

    fn default_workers() -> NonZeroUsize {
        const MAX_WORKERS: NonZeroUsize = match NonZeroUsize::new(4) {
            Some(n) => n,
            None => panic!("MAX_WORKERS is accidentally set to 0"),
        };

        std::thread::available_parallelism()
            .map(|n| n.min(MAX_WORKERS))
            .unwrap_or(NonZeroUsize::MIN)
    }
}
