//! Tracing initialization
//!
//! Installs the global subscriber: an `EnvFilter` driven by `RUST_LOG` and a
//! fmt layer, plain text or JSON depending on `FILEGATE_LOG_FORMAT`.

mod init_basic;

pub use init_basic::{init_telemetry, LogFormat, TelemetryError, DEFAULT_FILTER};
