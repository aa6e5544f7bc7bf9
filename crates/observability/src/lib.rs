//! Tracing and logging (shared setup for the service and the CLI).

pub use self::tracing::LogFormat;

/// Initialize process-wide logging, format taken from `DEMANDCAST_LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(LogFormat::from_env());
}

/// Initialize with an explicit output format.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}

/// Tracing configuration (filters, layers).
pub mod tracing;
