//! Conversion of raw textual values into field values.
//!
//! Conversion is driven purely by the target [`Shape`]; the content of the
//! raw value never changes which parser runs.

use std::num::IntErrorKind;

use thiserror::Error;

use crate::{Shape, Value};

/// Why a raw value could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The value is not syntactically valid for the target shape.
    #[error("invalid syntax: {value:?} is not a valid {expected}")]
    InvalidSyntax {
        /// The offending raw value.
        value: String,
        /// Target shape name.
        expected: String,
    },

    /// The value parses but does not fit the target width.
    #[error("value out of range: {value:?} does not fit in {expected}")]
    OutOfRange {
        /// The offending raw value.
        value: String,
        /// Target shape name.
        expected: String,
    },

    /// The target shape cannot be bound from a single textual value.
    #[error("value of type {0} not implemented")]
    Unsupported(&'static str),
}

impl CoerceError {
    fn invalid_syntax(raw: &str, shape: Shape) -> Self {
        Self::InvalidSyntax {
            value: raw.to_owned(),
            expected: shape.to_string(),
        }
    }

    fn out_of_range(raw: &str, shape: Shape) -> Self {
        Self::OutOfRange {
            value: raw.to_owned(),
            expected: shape.to_string(),
        }
    }
}

/// Converts `raw` into a [`Value`] of the given shape.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{coerce, CoerceError, Shape, Value};
///
/// assert_eq!(coerce("42", Shape::Int { bits: 8 }), Ok(Value::Int(42)));
/// assert_eq!(coerce("T", Shape::Bool), Ok(Value::Bool(true)));
/// assert!(matches!(
///     coerce("300", Shape::Uint { bits: 8 }),
///     Err(CoerceError::OutOfRange { .. })
/// ));
/// ```
pub fn coerce(raw: &str, shape: Shape) -> Result<Value, CoerceError> {
    match shape {
        Shape::Str => Ok(Value::Str(raw.to_owned())),
        Shape::Bytes => Ok(Value::Bytes(raw.as_bytes().to_vec())),
        Shape::Int { bits } => parse_int(raw, bits, shape).map(Value::Int),
        Shape::Uint { bits } => parse_uint(raw, bits, shape).map(Value::Uint),
        Shape::Float { bits } => parse_float(raw, bits, shape).map(Value::Float),
        Shape::Bool => parse_bool(raw, shape).map(Value::Bool),
        Shape::Unsupported(name) => Err(CoerceError::Unsupported(name)),
    }
}

fn parse_int(raw: &str, bits: u32, shape: Shape) -> Result<i128, CoerceError> {
    let value: i128 = raw.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            CoerceError::out_of_range(raw, shape)
        }
        _ => CoerceError::invalid_syntax(raw, shape),
    })?;

    let bits = bits.clamp(1, 128);
    if bits < 128 {
        let max = (1_i128 << (bits - 1)) - 1;
        let min = -(1_i128 << (bits - 1));
        if value < min || value > max {
            return Err(CoerceError::out_of_range(raw, shape));
        }
    }
    Ok(value)
}

fn parse_uint(raw: &str, bits: u32, shape: Shape) -> Result<u128, CoerceError> {
    // No sign prefix for unsigned values.
    if raw.starts_with('+') {
        return Err(CoerceError::invalid_syntax(raw, shape));
    }

    let value: u128 = raw.parse().map_err(|e: std::num::ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => CoerceError::out_of_range(raw, shape),
        _ => CoerceError::invalid_syntax(raw, shape),
    })?;

    let bits = bits.clamp(1, 128);
    if bits < 128 && value > (1_u128 << bits) - 1 {
        return Err(CoerceError::out_of_range(raw, shape));
    }
    Ok(value)
}

fn parse_float(raw: &str, bits: u32, shape: Shape) -> Result<f64, CoerceError> {
    let value = if bits <= 32 {
        let value: f32 = raw
            .parse()
            .map_err(|_| CoerceError::invalid_syntax(raw, shape))?;
        f64::from(value)
    } else {
        raw.parse::<f64>()
            .map_err(|_| CoerceError::invalid_syntax(raw, shape))?
    };

    // Finite input that overflowed to infinity.
    if value.is_infinite() && !is_infinity_literal(raw) {
        return Err(CoerceError::out_of_range(raw, shape));
    }
    Ok(value)
}

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

fn parse_bool(raw: &str, shape: Shape) -> Result<bool, CoerceError> {
    const TRUE: [&str; 3] = ["1", "t", "true"];
    const FALSE: [&str; 3] = ["0", "f", "false"];

    if TRUE.iter().any(|s| raw.eq_ignore_ascii_case(s)) {
        Ok(true)
    } else if FALSE.iter().any(|s| raw.eq_ignore_ascii_case(s)) {
        Ok(false)
    } else {
        Err(CoerceError::invalid_syntax(raw, shape))
    }
}
