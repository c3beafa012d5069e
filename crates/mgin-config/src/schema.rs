//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use serde::{Deserialize, Serialize};

use mgin_bind::{DEFAULT_MAX_FORM_SIZE, DEFAULT_MAX_MULTIPART_MEMORY};

/// Binding configuration section.
///
/// # Example
///
/// ```
/// use mgin_config::BindSettings;
///
/// let settings = BindSettings {
///     max_multipart_memory: 8 << 20,
///     max_form_size: 1 << 20,
///     strict_metadata: true,
/// };
/// assert!(settings.strict_metadata);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindSettings {
    /// Largest total size of non-file multipart values kept in memory, in bytes.
    #[serde(default = "default_max_multipart_memory")]
    pub max_multipart_memory: usize,

    /// Largest URL-encoded form body accepted, in bytes.
    #[serde(default = "default_max_form_size")]
    pub max_form_size: usize,

    /// Fail binds of records that have fields without a source.
    #[serde(default)]
    pub strict_metadata: bool,
}

impl Default for BindSettings {
    fn default() -> Self {
        Self {
            max_multipart_memory: default_max_multipart_memory(),
            max_form_size: default_max_form_size(),
            strict_metadata: false,
        }
    }
}

fn default_max_multipart_memory() -> usize {
    DEFAULT_MAX_MULTIPART_MEMORY
}

fn default_max_form_size() -> usize {
    DEFAULT_MAX_FORM_SIZE
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive (trace, debug, info, warn, error, or per-target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,

    /// Log span open and close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
            span_events: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
