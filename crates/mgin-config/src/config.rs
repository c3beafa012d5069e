//! Main configuration types.
//!
//! This module provides the top-level [`MginConfig`] struct and its
//! conversions into the runtime configs of `mgin-bind` and `mgin-telemetry`.

use serde::{Deserialize, Serialize};

use mgin_bind::BindConfig;
use mgin_telemetry::LogConfig;

use crate::{BindSettings, ConfigError, LogFormat, LoggingSettings};

/// Complete mgin configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load configuration from files
/// and environment variables.
///
/// # Example
///
/// ```
/// use mgin_config::MginConfig;
///
/// let config = MginConfig::default();
/// assert_eq!(config.bind.max_multipart_memory, 32 << 20);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct MginConfig {
    /// Request binding configuration.
    #[serde(default)]
    pub bind: BindSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl MginConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A size limit is zero
    /// - Logging is enabled with an invalid level directive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind.max_multipart_memory == 0 {
            return Err(ConfigError::invalid_value(
                "bind.max_multipart_memory",
                "must be greater than 0",
            ));
        }

        if self.bind.max_form_size == 0 {
            return Err(ConfigError::invalid_value(
                "bind.max_form_size",
                "must be greater than 0",
            ));
        }

        if self.logging.enabled {
            mgin_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Create a development configuration preset.
    ///
    /// Pretty, colored debug logs with source locations and span events, and
    /// strict metadata checking so unbound fields surface early.
    ///
    /// # Example
    ///
    /// ```
    /// use mgin_config::{LogFormat, MginConfig};
    ///
    /// let config = MginConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();

        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.ansi_enabled = true;
        config.logging.include_location = true;
        config.logging.span_events = true;

        config.bind.strict_metadata = true;

        config
    }

    /// Create a production configuration preset.
    ///
    /// JSON logs at `info`.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();

        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.ansi_enabled = false;

        config
    }

    /// Returns the binder configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use mgin_config::MginConfig;
    ///
    /// let bind = MginConfig::development().bind_config();
    /// assert!(bind.strict_metadata);
    /// ```
    #[must_use]
    pub fn bind_config(&self) -> BindConfig {
        BindConfig::new()
            .max_multipart_memory(self.bind.max_multipart_memory)
            .max_form_size(self.bind.max_form_size)
            .strict_metadata(self.bind.strict_metadata)
    }

    /// Returns the logging configuration.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            json_format: self.logging.format == LogFormat::Json,
            span_events: self.logging.span_events,
            file_line_info: self.logging.include_location,
            ansi: self.logging.ansi_enabled,
            include_target: true,
        }
    }
}
