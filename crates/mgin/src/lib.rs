//! # mgin
//!
//! **Declarative binding of HTTP request values into typed records.**
//!
//! A record declares, per field, where its value lives in the request (path
//! parameter, query string, form body, header or cookie). mgin reads each
//! declared value, converts it to the field's type and reports the first
//! failure with the HTTP status it maps to.
//!
//! This crate re-exports the pieces:
//!
//! - [`bind`]: the binder, request context and validators (`mgin-bind`)
//! - [`config`]: layered configuration (`mgin-config`)
//! - [`telemetry`]: logging setup (`mgin-telemetry`)
//!
//! ## Quick Start
//!
//! Records deriving [`Bindable`] through this facade name the runtime path
//! with `#[bind(crate = "mgin::bind")]`.
//!
//! ```rust
//! use mgin::prelude::*;
//!
//! #[derive(Debug, Default, Bindable)]
//! #[bind(crate = "mgin::bind")]
//! struct GetUser {
//!     #[bind(path = "id", validate = "gt=0")]
//!     id: u64,
//!     #[bind(query = "verbose", optional)]
//!     verbose: bool,
//! }
//!
//! let config = MginConfig::default();
//! let ctx = RequestContext::builder()
//!     .uri("/users/42?verbose=true")
//!     .path_param("id", "42")
//!     .config(config.bind_config())
//!     .build();
//!
//! let mut req = GetUser::default();
//! ctx.bind_and_validate(&mut req).unwrap();
//! assert_eq!(req.id, 42);
//! assert!(req.verbose);
//! ```

#![doc(html_root_url = "https://docs.rs/mgin/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export binding types
pub use mgin_bind as bind;

// Re-export configuration types
pub use mgin_config as config;

// Re-export telemetry types
pub use mgin_telemetry as telemetry;

// Re-export the derive macro
pub use mgin_bind::Bindable;

/// Initializes logging from a loaded configuration.
///
/// # Errors
///
/// Returns an error if the configured level is invalid or a global
/// subscriber is already installed.
///
/// # Example
///
/// ```rust,no_run
/// use mgin::config::ConfigLoader;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConfigLoader::new().with_env_prefix("MGIN").load()?;
/// mgin::init_logging(&config)?;
/// # Ok(())
/// # }
/// ```
pub fn init_logging(config: &mgin_config::MginConfig) -> mgin_telemetry::TelemetryResult<()> {
    mgin_telemetry::init_logging(&config.log_config())
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use mgin::prelude::*;
/// ```
pub mod prelude {
    pub use mgin_bind::{
        bind, bind_and_validate, bind_and_validate_with, BindConfig, BindError, BindMode,
        BindOutcome, Bindable, PathParams, RequestContext, RuleValidator, SourceKind,
        ValidationError, Validator,
    };
    pub use mgin_config::{ConfigLoader, MginConfig};
}
