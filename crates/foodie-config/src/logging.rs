use serde::Deserialize;

/// How log lines are rendered on the console.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoggingStyle {
    Compact,
    #[default]
    Full,
    Pretty,
    /// One JSON object per line. Useful for log collectors.
    Json,
}

#[derive(Debug, Default, Deserialize)]
pub struct Logging {
    /// **Environment variables**:
    /// - `FOODIE_LOGGING_STYLE`
    #[serde(default)]
    pub style: LoggingStyle,

    /// Logging targets with the same syntax as `RUST_LOG`. If it is empty,
    /// `RUST_LOG` is used instead.
    ///
    /// **Environment variables**:
    /// - `FOODIE_LOGGING_TARGETS`
    #[serde(default)]
    pub targets: String,
}
