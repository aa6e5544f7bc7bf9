//! Tracing/logging initialization.
//!
//! Filtering is configurable via `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "DEMANDCAST_LOG_FORMAT";

/// Output layout of log lines.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, with timestamps.
    #[default]
    Json,
    /// Human-readable lines for terminals.
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        Self::from_env_or(LogFormat::default())
    }

    /// Format from `DEMANDCAST_LOG_FORMAT`, or `fallback` when unset.
    pub fn from_env_or(fallback: LogFormat) -> Self {
        std::env::var(ENV_LOG_FORMAT)
            .ok()
            .map(|v| Self::parse(&v))
            .unwrap_or(fallback)
    }

    /// `pretty`/`text`/`human` select `Pretty`; anything else is `Json`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" | "human" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Logs go to
/// stderr so command output on stdout stays clean.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init(),
        LogFormat::Pretty => builder.compact().try_init(),
    };
}
