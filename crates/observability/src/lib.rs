//! Tracing/logging setup shared by the binaries.

pub mod tracing;

pub use crate::tracing::LogFormat;

/// Initialize process-wide logging.
///
/// Filter comes from `RUST_LOG` (default `info`), format from
/// `STOREPULSE_LOG_FORMAT` (default JSON). Safe to call multiple times;
/// subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(LogFormat::from_env());
}
