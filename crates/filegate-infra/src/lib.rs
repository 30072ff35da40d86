//! Filegate Infrastructure Library
//!
//! Shared infrastructure for processes embedding the validation pipeline:
//! - Telemetry initialization (tracing subscriber)

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, LogFormat, TelemetryError, DEFAULT_FILTER};
