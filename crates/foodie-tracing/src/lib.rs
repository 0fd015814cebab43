use foodie_config::{vars, LoggingStyle};
use foodie_error::ext::ResultExt;
use foodie_error::Result;
use foodie_utils::env;
use std::io::IsTerminal;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::{warn, Subscriber};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Installs the global tracing subscriber based on the logging
/// configuration of the server.
pub fn init(config: &foodie_config::Logging) -> Result<(), TracingInitError> {
    let rust_log = env::var_opt("RUST_LOG").change_context(TracingInitError)?;
    let targets = if config.targets.is_empty() {
        rust_log.as_deref().unwrap_or_default()
    } else {
        config.targets.as_str()
    };

    let registry = tracing_subscriber::Registry::default()
        .with(console_layer(config.style, std::io::stderr().is_terminal()))
        .with(make_env_filter(targets));

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if rust_log.is_some() && !config.targets.is_empty() {
        warn!(
            "Both `RUST_LOG` and `{}` are set, the latter is used to determine logging targets",
            vars::LOGGING_TARGETS
        );
    }

    Ok(())
}

/// Installs a subscriber that writes through the test harness so the
/// output is captured per test. Calling it more than once is a no-op.
pub fn init_for_tests() {
    let targets = std::env::var("RUST_LOG").unwrap_or_default();
    let registry = tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_test_writer()
                .with_ansi(false),
        )
        .with(make_env_filter(&targets));

    if tracing::subscriber::set_global_default(registry).is_err() {
        tracing::trace!("tracing is already initialized for tests");
    }
}

fn console_layer<S>(style: LoggingStyle, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi);

    match style {
        LoggingStyle::Compact => layer.compact().boxed(),
        LoggingStyle::Full => layer.boxed(),
        LoggingStyle::Pretty => layer.pretty().boxed(),
        LoggingStyle::Json => layer.json().with_current_span(true).boxed(),
    }
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if foodie_utils::RELEASE {
        LevelFilter::INFO
    } else {
        LevelFilter::DEBUG
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
