//! The binding orchestrator.
//!
//! Walks a record's [`Schema`] in field order, reads each field's winning
//! source, converts the raw value and stores it. Binding is fail-fast: the
//! first fatal error stops the walk and is returned as is.
//!
//! Two modes exist:
//!
//! - [`bind`] never enforces presence. An absent value leaves the field
//!   untouched, and a conversion error is swallowed when the field is marked
//!   `ignore_error`.
//! - [`bind_and_validate`] requires every non-optional field to be present,
//!   treats every conversion error as fatal and finally runs a [`Validator`]
//!   over the populated record.
//!
//! A value is absent when the source does not contain the key or contains it
//! with an empty value.

use std::fmt;

use tracing::{debug, trace};

use crate::{
    coerce, BindError, Bindable, FieldSpec, RequestContext, RuleValidator, Shape, Validator,
};

/// Which policy a bind applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMode {
    /// Presence is not enforced and `ignore_error` is honored.
    ReadOnly,
    /// Presence is enforced and the record is validated afterwards.
    Validated,
}

impl fmt::Display for BindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => f.write_str("read_only"),
            Self::Validated => f.write_str("validated"),
        }
    }
}

/// Terminal state of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOutcome {
    /// The field declares no source.
    Unbound,
    /// The value was absent and the field was left untouched.
    Skipped,
    /// The value was converted and stored.
    Converted,
    /// Conversion failed and the error was swallowed.
    Ignored,
}

/// Populates `record` from the request without enforcing presence.
///
/// # Errors
///
/// Returns the first fatal [`BindError`]: a conversion error on a field not
/// marked `ignore_error`, a form body that cannot be parsed, a field of an
/// unsupported type (present or not), or, in strict mode, a field without
/// binding metadata.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{bind, Bindable, RequestContext};
///
/// #[derive(Debug, Default, Bindable)]
/// struct Page {
///     #[bind(query = "page")]
///     page: u32,
///     #[bind(query = "size", ignore_error)]
///     size: u32,
/// }
///
/// let ctx = RequestContext::builder().uri("/items?page=3&size=lots").build();
/// let mut page = Page::default();
///
/// bind(&ctx, &mut page).unwrap();
/// assert_eq!(page.page, 3);
/// assert_eq!(page.size, 0);
/// ```
pub fn bind<T: Bindable>(ctx: &RequestContext, record: &mut T) -> Result<(), BindError> {
    bind_fields(ctx, record, BindMode::ReadOnly)
}

/// Populates `record`, enforcing presence, then checks it with
/// [`RuleValidator`].
///
/// # Errors
///
/// Returns the first fatal [`BindError`]. In this mode a missing required
/// value and any conversion error are fatal, as is a failed validation.
///
/// # Example
///
/// ```rust
/// use mgin_bind::{bind_and_validate, BindError, Bindable, RequestContext};
/// use http::StatusCode;
///
/// #[derive(Debug, Default, Bindable)]
/// struct GetUser {
///     #[bind(path = "id", validate = "gt=0")]
///     id: i64,
///     #[bind(query = "active", optional)]
///     active: bool,
/// }
///
/// let ctx = RequestContext::builder().uri("/users/42").path_param("id", "42").build();
/// let mut req = GetUser::default();
/// bind_and_validate(&ctx, &mut req).unwrap();
/// assert_eq!(req.id, 42);
/// assert!(!req.active);
///
/// let ctx = RequestContext::builder().uri("/users/0").path_param("id", "0").build();
/// let err = bind_and_validate(&ctx, &mut GetUser::default()).unwrap_err();
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert!(matches!(err, BindError::Validation(_)));
/// ```
pub fn bind_and_validate<T: Bindable>(
    ctx: &RequestContext,
    record: &mut T,
) -> Result<(), BindError> {
    bind_and_validate_with(ctx, record, &RuleValidator)
}

/// Populates `record`, enforcing presence, then checks it with `validator`.
///
/// # Errors
///
/// As [`bind_and_validate`]. A validator failure becomes
/// [`BindError::Validation`] with the validator's error text unchanged.
pub fn bind_and_validate_with<T, V>(
    ctx: &RequestContext,
    record: &mut T,
    validator: &V,
) -> Result<(), BindError>
where
    T: Bindable,
    V: Validator<T> + ?Sized,
{
    bind_fields(ctx, record, BindMode::Validated)?;

    validator.validate(record).map_err(|error| {
        debug!(record = T::schema().type_name, %error, "validation failed");
        BindError::from(error)
    })
}

fn bind_fields<T: Bindable>(
    ctx: &RequestContext,
    record: &mut T,
    mode: BindMode,
) -> Result<(), BindError> {
    let schema = T::schema();
    let span = tracing::debug_span!("mgin.bind", record = schema.type_name, %mode);
    let _enter = span.enter();

    for (index, field) in schema.fields.iter().enumerate() {
        match bind_field(ctx, record, schema.type_name, index, field, mode) {
            Ok(outcome) => trace!(field = field.name, ?outcome, "field done"),
            Err(error) => {
                debug!(
                    field = field.name,
                    status = error.status_code().as_u16(),
                    %error,
                    "bind failed"
                );
                return Err(error);
            }
        }
    }

    Ok(())
}

fn bind_field<T: Bindable>(
    ctx: &RequestContext,
    record: &mut T,
    type_name: &'static str,
    index: usize,
    field: &FieldSpec,
    mode: BindMode,
) -> Result<FieldOutcome, BindError> {
    let Some(source) = field.source() else {
        if ctx.config.strict_metadata {
            return Err(BindError::structural(
                type_name,
                format!("field {} declares no source", field.name),
            ));
        }
        return Ok(FieldOutcome::Unbound);
    };

    let raw = ctx
        .read(source.kind, source.key)?
        .filter(|raw| !raw.is_empty());

    // Presence policy comes first in validated mode, whatever the shape.
    if raw.is_none() && mode == BindMode::Validated {
        return if field.optional {
            Ok(FieldOutcome::Skipped)
        } else {
            Err(BindError::missing(field.name, source.kind, source.key))
        };
    }

    if let Shape::Unsupported(type_name) = field.shape {
        return Err(BindError::NotImplemented {
            field: field.name,
            type_name,
        });
    }

    let Some(raw) = raw else {
        return Ok(FieldOutcome::Skipped);
    };

    match coerce(&raw, field.shape) {
        Ok(value) => {
            record.assign(index, value)?;
            Ok(FieldOutcome::Converted)
        }
        Err(error) if mode == BindMode::ReadOnly && field.ignore_error => {
            debug!(field = field.name, %error, "conversion error ignored");
            Ok(FieldOutcome::Ignored)
        }
        Err(error) => Err(BindError::Conversion {
            field: field.name,
            origin: source.kind,
            key: source.key,
            error,
        }),
    }
}

impl RequestContext {
    /// Populates `record` from this request. See [`bind`].
    ///
    /// # Errors
    ///
    /// See [`bind`].
    pub fn bind<T: Bindable>(&self, record: &mut T) -> Result<(), BindError> {
        bind(self, record)
    }

    /// Populates and validates `record`. See [`bind_and_validate`].
    ///
    /// # Errors
    ///
    /// See [`bind_and_validate`].
    pub fn bind_and_validate<T: Bindable>(&self, record: &mut T) -> Result<(), BindError> {
        bind_and_validate(self, record)
    }

    /// Populates `record` and validates it with `validator`.
    ///
    /// # Errors
    ///
    /// See [`bind_and_validate_with`].
    pub fn bind_and_validate_with<T, V>(&self, record: &mut T, validator: &V) -> Result<(), BindError>
    where
        T: Bindable,
        V: Validator<T> + ?Sized,
    {
        bind_and_validate_with(self, record, validator)
    }
}
