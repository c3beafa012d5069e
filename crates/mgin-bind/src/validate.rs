//! Validation of bound records.
//!
//! After a validated bind has populated every field, the record is handed to
//! a [`Validator`]. Any closure `Fn(&T) -> Result<(), ValidationError>` is a
//! validator, and [`RuleValidator`] evaluates the `validate = "..."` rules
//! declared on the record's fields.
//!
//! # Rules
//!
//! A rule expression is a comma-separated list of rules:
//!
//! | Rule | Meaning |
//! |---|---|
//! | `required` | value is not the zero value of its type |
//! | `omitempty` | skip the remaining rules when the value is zero |
//! | `gt=N`, `gte=N`, `lt=N`, `lte=N` | numeric bound, or length bound for text and bytes |
//! | `min=N`, `max=N` | aliases for `gte` and `lte` |
//! | `len=N` | exact numeric value, or exact length |
//! | `eq=X`, `ne=X` | equality; text compares by content |
//! | `oneof=A B C` | value is one of the space-separated options |
//!
//! Lengths of text are counted in characters. An unknown rule fails
//! validation.

use std::fmt;

use crate::{Bindable, Value};

/// Checks a fully bound record.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{ValidationError, Validator};
///
/// struct Signup {
///     age: u32,
/// }
///
/// let adult = |s: &Signup| {
///     if s.age >= 18 {
///         Ok(())
///     } else {
///         Err(ValidationError::field("age", "min", "must be at least 18"))
///     }
/// };
///
/// assert!(adult.validate(&Signup { age: 30 }).is_ok());
/// assert!(adult.validate(&Signup { age: 12 }).is_err());
/// ```
pub trait Validator<T: ?Sized> {
    /// Validates `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing every failed check.
    fn validate(&self, value: &T) -> Result<(), ValidationError>;
}

impl<T, F> Validator<T> for F
where
    T: ?Sized,
    F: Fn(&T) -> Result<(), ValidationError>,
{
    fn validate(&self, value: &T) -> Result<(), ValidationError> {
        self(value)
    }
}

/// A single failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    /// The field that failed. Empty for record-level failures.
    pub field: String,
    /// The rule that failed.
    pub rule: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Error produced by a [`Validator`].
///
/// Its display text is passed through unchanged as the bind error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    failures: Vec<FieldFailure>,
}

impl ValidationError {
    /// Creates a record-level error carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            failures: vec![FieldFailure {
                field: String::new(),
                rule: String::new(),
                message: message.into(),
            }],
        }
    }

    /// Creates an error for one field and rule.
    pub fn field(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            failures: vec![FieldFailure {
                field: field.into(),
                rule: rule.into(),
                message: message.into(),
            }],
        }
    }

    /// Returns every failed check, in field order.
    #[must_use]
    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validator that evaluates the rules declared on each field.
///
/// Fields without rules always pass. All fields are checked and every failure
/// is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl<T: Bindable> Validator<T> for RuleValidator {
    fn validate(&self, record: &T) -> Result<(), ValidationError> {
        let mut failures = Vec::new();

        for (index, field) in T::schema().fields.iter().enumerate() {
            let Some(rules) = field.rules else {
                continue;
            };
            let Some(value) = record.value(index) else {
                failures.push(FieldFailure {
                    field: field.name.to_owned(),
                    rule: rules.to_owned(),
                    message: format!("rules cannot be applied to a {} field", field.shape),
                });
                continue;
            };
            if let Some(failure) = check_rules(field.name, rules, &value) {
                failures.push(failure);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { failures })
        }
    }
}

/// Runs a rule expression against one value, stopping at the first failure.
fn check_rules(field: &str, rules: &str, value: &Value) -> Option<FieldFailure> {
    for rule in rules.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        let (name, param) = rule.split_once('=').unwrap_or((rule, ""));

        if name == "omitempty" {
            if value.is_zero() {
                return None;
            }
            continue;
        }

        if let Err(message) = check_rule(name, param, value) {
            return Some(FieldFailure {
                field: field.to_owned(),
                rule: name.to_owned(),
                message,
            });
        }
    }
    None
}

/// What a rule compares against.
enum Measure<'a> {
    Number(f64),
    Text(&'a str),
    Bytes(&'a [u8]),
    Bool(bool),
}

impl<'a> Measure<'a> {
    #[allow(clippy::cast_precision_loss)]
    fn of(value: &'a Value) -> Self {
        match value {
            Value::Str(s) => Self::Text(s),
            Value::Bytes(b) => Self::Bytes(b),
            Value::Int(v) => Self::Number(*v as f64),
            Value::Uint(v) => Self::Number(*v as f64),
            Value::Float(v) => Self::Number(*v),
            Value::Bool(v) => Self::Bool(*v),
        }
    }

    /// Number for numeric values, length for text and bytes.
    #[allow(clippy::cast_precision_loss)]
    fn magnitude(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => Some(s.chars().count() as f64),
            Self::Bytes(b) => Some(b.len() as f64),
            Self::Bool(_) => None,
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Self::Number(_) | Self::Bool(_) => "",
            Self::Text(_) => " characters",
            Self::Bytes(_) => " bytes",
        }
    }

    fn equals(&self, param: &str) -> Result<bool, String> {
        match self {
            Self::Text(s) => Ok(*s == param),
            Self::Bool(b) => match param {
                "true" => Ok(*b),
                "false" => Ok(!*b),
                _ => Err(format!("invalid boolean parameter {param:?}")),
            },
            Self::Number(_) | Self::Bytes(_) => {
                let expected = parse_param(param)?;
                Ok(self.magnitude() == Some(expected))
            }
        }
    }
}

fn parse_param(param: &str) -> Result<f64, String> {
    param
        .parse()
        .map_err(|_| format!("invalid rule parameter {param:?}"))
}

fn check_rule(name: &str, param: &str, value: &Value) -> Result<(), String> {
    let measure = Measure::of(value);

    let bound = |check: fn(f64, f64) -> bool, phrase: &str| -> Result<(), String> {
        let limit = parse_param(param)?;
        let actual = measure
            .magnitude()
            .ok_or_else(|| format!("rule {name} does not apply to booleans"))?;
        if check(actual, limit) {
            Ok(())
        } else {
            Err(format!("must be {phrase} {param}{}", measure.noun()))
        }
    };

    match name {
        "required" => {
            if value.is_zero() {
                Err("is required".to_owned())
            } else {
                Ok(())
            }
        }
        "gt" => bound(|a, b| a > b, "greater than"),
        "gte" | "min" => bound(|a, b| a >= b, "at least"),
        "lt" => bound(|a, b| a < b, "less than"),
        "lte" | "max" => bound(|a, b| a <= b, "at most"),
        #[allow(clippy::float_cmp)]
        "len" => bound(|a, b| a == b, "exactly"),
        "eq" => {
            if measure.equals(param)? {
                Ok(())
            } else {
                Err(format!("must equal {param}"))
            }
        }
        "ne" => {
            if measure.equals(param)? {
                Err(format!("must not equal {param}"))
            } else {
                Ok(())
            }
        }
        "oneof" => {
            for option in param.split_whitespace() {
                if measure.equals(option)? {
                    return Ok(());
                }
            }
            Err(format!("must be one of [{param}]"))
        }
        _ => Err(format!("unknown validation rule {name:?}")),
    }
}
