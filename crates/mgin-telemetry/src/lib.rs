//! Logging setup for mgin services.
//!
//! The binding crates emit structured `tracing` events: every bind runs in an
//! `mgin.bind` span carrying the record type and mode, and failures are
//! logged at `debug` with the field and status code. This crate installs a
//! `tracing-subscriber` that renders them.
//!
//! # Example
//!
//! ```rust,no_run
//! use mgin_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig {
//!     level: "info,mgin_bind=debug".to_string(),
//!     ..LogConfig::production()
//! };
//! init_logging(&config).expect("logging already initialized");
//! ```

#![doc(html_root_url = "https://docs.rs/mgin-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
