//! Converted field values and the glue between them and concrete field types.

use bytes::Bytes;

/// A value produced by the coercion dispatcher, ready to be stored in a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Signed integer, already range-checked for the target width.
    Int(i128),
    /// Unsigned integer, already range-checked for the target width.
    Uint(u128),
    /// Floating point.
    Float(f64),
    /// Boolean.
    Bool(bool),
}

impl Value {
    /// Returns true if this is the zero value of its type.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Int(v) => *v == 0,
            Self::Uint(v) => *v == 0,
            Self::Float(v) => *v == 0.0,
            Self::Bool(v) => !v,
        }
    }
}

/// Converts a [`Value`] into a concrete field type.
///
/// Returns `None` when the value variant does not match the type, which only
/// happens when a schema disagrees with the record it describes.
pub trait FromValue: Sized {
    /// Performs the conversion.
    fn from_value(value: Value) -> Option<Self>;
}

/// Snapshots a field as a [`Value`].
pub trait IntoValue {
    /// Performs the conversion.
    fn to_value(&self) -> Value;
}

impl FromValue for String {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl IntoValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl IntoValue for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bytes(self.clone())
    }
}

impl FromValue for Bytes {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(Bytes::from(b)),
            _ => None,
        }
    }
}

impl IntoValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bytes(self.to_vec())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl IntoValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl IntoValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            // Already rounded to f32 precision by the dispatcher.
            Value::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl IntoValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(v) => <$t>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            impl IntoValue for $t {
                #[allow(clippy::cast_lossless)]
                fn to_value(&self) -> Value {
                    Value::Int(*self as i128)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Uint(v) => <$t>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }

            impl IntoValue for $t {
                #[allow(clippy::cast_lossless)]
                fn to_value(&self) -> Value {
                    Value::Uint(*self as u128)
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, i128, isize);
impl_unsigned!(u8, u16, u32, u64, u128, usize);
