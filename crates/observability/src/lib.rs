//! Tracing and logging (shared setup).

/// Initialize process-wide observability with default settings.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(&LogSettings::default());
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{init_with, LogFormat, LogSettings, ParseLogFormatError};
