//! Binder configuration.

/// Default limit for multipart values held in memory (32 MiB).
pub const DEFAULT_MAX_MULTIPART_MEMORY: usize = 32 << 20;

/// Default limit for a URL-encoded form body (10 MiB).
pub const DEFAULT_MAX_FORM_SIZE: usize = 10 << 20;

/// Limits and switches applied while binding a request.
///
/// # Example
///
/// ```rust
/// use mgin_bind::BindConfig;
///
/// let config = BindConfig::new()
///     .max_multipart_memory(1 << 20)
///     .strict_metadata(true);
///
/// assert_eq!(config.max_multipart_memory, 1 << 20);
/// assert!(config.strict_metadata);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindConfig {
    /// Maximum total size in bytes of the non-file multipart values held in
    /// memory. File parts are skipped and not counted.
    pub max_multipart_memory: usize,
    /// Maximum URL-encoded form body size in bytes.
    pub max_form_size: usize,
    /// Treat fields without binding metadata as a destination error.
    pub strict_metadata: bool,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            max_multipart_memory: DEFAULT_MAX_MULTIPART_MEMORY,
            max_form_size: DEFAULT_MAX_FORM_SIZE,
            strict_metadata: false,
        }
    }
}

impl BindConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the multipart memory limit.
    #[must_use]
    pub fn max_multipart_memory(mut self, size: usize) -> Self {
        self.max_multipart_memory = size;
        self
    }

    /// Sets the URL-encoded form size limit.
    #[must_use]
    pub fn max_form_size(mut self, size: usize) -> Self {
        self.max_form_size = size;
        self
    }

    /// Enables or disables strict metadata checking.
    #[must_use]
    pub fn strict_metadata(mut self, strict: bool) -> Self {
        self.strict_metadata = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BindConfig::default();
        assert_eq!(config.max_multipart_memory, 33_554_432);
        assert_eq!(config.max_form_size, 10_485_760);
        assert!(!config.strict_metadata);
    }
}
