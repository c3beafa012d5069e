//! Typed configuration for mgin.
//!
//! Configuration is layered: built-in defaults, then an optional TOML or JSON
//! file, then environment variables. Unknown fields in files are rejected.
//!
//! # Example
//!
//! ```no_run
//! use mgin_config::ConfigLoader;
//!
//! # fn main() -> Result<(), mgin_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("mgin.toml")?
//!     .with_env_prefix("MGIN")
//!     .load()?;
//!
//! let bind_config = config.bind_config();
//! # let _ = bind_config;
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [bind]
//! max_multipart_memory = 33554432
//! max_form_size = 10485760
//! strict_metadata = false
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ansi_enabled = false
//! include_location = false
//! span_events = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! With prefix `MGIN`, every key above can be overridden as
//! `MGIN__SECTION__KEY`, for example `MGIN__BIND__STRICT_METADATA=true` or
//! `MGIN__LOGGING__FORMAT=pretty`. Booleans accept `true/1/yes/on` and
//! `false/0/no/off`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::MginConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{BindSettings, LogFormat, LoggingSettings};
