//! Binding error types.
//!
//! Every failure a bind can produce is a [`BindError`]. Each variant maps to
//! exactly one HTTP status code, so callers can render `(status, error)`
//! without inspecting the cause.

use http::StatusCode;
use thiserror::Error;

use crate::{CoerceError, SourceKind, ValidationError};

/// Error returned by a bind, JSON read or validation pass.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{BindError, SourceKind};
/// use http::StatusCode;
///
/// let err = BindError::missing("token", SourceKind::Query, "token");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.field(), Some("token"));
/// assert!(err.to_string().contains("token"));
/// ```
#[derive(Debug, Error)]
pub enum BindError {
    /// The destination cannot be bound. This is a programming mistake.
    #[error("destination {type_name} cannot be bound: {reason}")]
    Structural {
        /// Record type name.
        type_name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A required field has no value in the request.
    #[error("no value specified for field {field} ({origin} \"{key}\")")]
    MissingValue {
        /// Rust field name.
        field: &'static str,
        /// Declared source.
        origin: SourceKind,
        /// Declared key.
        key: &'static str,
    },

    /// A value is present but does not convert to the field's type.
    #[error("invalid value for field {field} ({origin} \"{key}\"): {error}")]
    Conversion {
        /// Rust field name.
        field: &'static str,
        /// Declared source.
        origin: SourceKind,
        /// Declared key.
        key: &'static str,
        /// Conversion failure.
        #[source]
        error: CoerceError,
    },

    /// A request location could not be read, e.g. a malformed form body.
    #[error("failed to read {origin} values: {message}")]
    Source {
        /// Location that failed.
        origin: SourceKind,
        /// Underlying parse failure.
        message: String,
    },

    /// The field's type cannot be bound from a textual value.
    #[error("value of type {type_name} not implemented for field {field}")]
    NotImplemented {
        /// Rust field name.
        field: &'static str,
        /// Field type as written.
        type_name: &'static str,
    },

    /// The bound record failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The JSON body could not be decoded.
    #[error("invalid JSON body: {0}")]
    Json(String),
}

impl BindError {
    /// Creates a structural error.
    pub fn structural(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Structural {
            type_name,
            reason: reason.into(),
        }
    }

    /// Creates a missing-value error.
    pub fn missing(field: &'static str, origin: SourceKind, key: &'static str) -> Self {
        Self::MissingValue { field, origin, key }
    }

    /// Creates a source read error.
    pub fn source_failed(origin: SourceKind, message: impl Into<String>) -> Self {
        Self::Source {
            origin,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Structural { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::MissingValue { .. }
            | Self::Conversion { .. }
            | Self::Source { .. }
            | Self::Validation(_)
            | Self::Json(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns a stable error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Structural { .. } => "INVALID_DESTINATION",
            Self::MissingValue { .. } => "MISSING_PARAMETER",
            Self::Conversion { .. } => "INVALID_PARAMETER",
            Self::Source { .. } => "UNREADABLE_SOURCE",
            Self::NotImplemented { .. } => "UNSUPPORTED_FIELD_TYPE",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Json(_) => "INVALID_JSON",
        }
    }

    /// Returns the Rust field name the error refers to, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingValue { field, .. }
            | Self::Conversion { field, .. }
            | Self::NotImplemented { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// The `(status, error)` pair handed back to the caller of a bind.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{BindError, BindOutcome};
/// use http::StatusCode;
///
/// let outcome = BindOutcome::from(Ok::<(), BindError>(()));
/// assert_eq!(outcome.status, StatusCode::OK);
/// assert!(outcome.error.is_none());
/// ```
#[derive(Debug)]
pub struct BindOutcome {
    /// Status to respond with.
    pub status: StatusCode,
    /// The first fatal error, if any.
    pub error: Option<BindError>,
}

impl BindOutcome {
    /// Returns true if the bind succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<(), BindError>> for BindOutcome {
    fn from(result: Result<(), BindError>) -> Self {
        match result {
            Ok(()) => Self {
                status: StatusCode::OK,
                error: None,
            },
            Err(error) => Self {
                status: error.status_code(),
                error: Some(error),
            },
        }
    }
}
