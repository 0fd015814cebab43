//! Names of environment variables read outside of the figment providers.

/// Path of the server configuration file.
pub const SERVER_CONFIG_FILE: &str = "FOODIE_CONFIG_FILE";

/// Global logging targets, same syntax as `RUST_LOG`.
pub const LOGGING_TARGETS: &str = "FOODIE_LOGGING_TARGETS";
