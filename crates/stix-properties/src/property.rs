//! # Property Descriptors
//!
//! A [`Property`] is attached to a field name by an object schema. It pairs
//! a [`PropertyKind`] (the kind-specific clean/validate/default logic) with
//! the options every kind shares:
//!
//! - `required`: no implicit default; absence is an error for the owning
//!   object.
//! - `fixed`: a constant the field must equal. It is both the only valid
//!   input and the default.
//! - `clean` / `default` overrides: plain functions supplied at schema
//!   definition time.
//! - `type` tag: an optional object-type name carried for the schema.
//!
//! ## Fixed Values
//!
//! Fixed-value enforcement is checked by [`Property::validate`] and
//! [`Property::default`] before any kind-specific logic or override runs.
//! A descriptor with a fixed value therefore validates by exact match and
//! defaults to the constant no matter which other options were supplied.
//!
//! ## Default Composition
//!
//! [`PropertyKind::validate`] defaults to "clean, or pass the raw value
//! through if the kind defines no coercion". The "no coercion" case is the
//! [`PropertyError::NoCoercion`] signal; it never reaches callers.

use std::fmt;
use std::sync::Arc;

use stix_core::{PropertyError, Value};

/// A `clean` override: coerce a raw value or reject it.
pub type CleanFn = Arc<dyn Fn(&Value) -> Result<Value, PropertyError> + Send + Sync>;

/// A `default` override.
pub type DefaultFn = Arc<dyn Fn() -> DefaultValue + Send + Sync>;

/// What a property's `default()` produces.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// A concrete value.
    Value(Value),
    /// "The current instant", resolved once per object construction so that
    /// every field defaulted this way receives the identical timestamp.
    Now,
}

impl From<Value> for DefaultValue {
    fn from(value: Value) -> Self {
        DefaultValue::Value(value)
    }
}

/// The clean step handed to [`PropertyKind::validate`].
///
/// Resolves to the descriptor's `clean` override when one was supplied,
/// otherwise to the kind's own [`PropertyKind::clean`].
pub struct Cleaner<'a> {
    kind: &'a dyn PropertyKind,
    custom: Option<&'a CleanFn>,
}

impl<'a> Cleaner<'a> {
    /// Clean `value` through the override or the kind.
    pub fn clean(&self, value: &Value) -> Result<Value, PropertyError> {
        match self.custom {
            Some(f) => f(value),
            None => self.kind.clean(value),
        }
    }
}

/// Kind-specific property behavior.
///
/// Concrete kinds override whichever operations they need; the defaults
/// implement the base contract.
pub trait PropertyKind: fmt::Debug + Send + Sync {
    /// Short kind name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Coerce `value` into this kind's shape.
    ///
    /// The default defines no coercion and returns
    /// [`PropertyError::NoCoercion`].
    fn clean(&self, _value: &Value) -> Result<Value, PropertyError> {
        Err(PropertyError::NoCoercion)
    }

    /// Validate `value`, returning the (possibly coerced) result.
    ///
    /// The default calls `clean`; if no coercion is defined the raw value is
    /// returned unchanged, and any other failure propagates.
    fn validate(&self, value: Value, cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        match cleaner.clean(&value) {
            Ok(cleaned) => Ok(cleaned),
            Err(e) if e.is_no_coercion() => Ok(value),
            Err(e) => Err(e),
        }
    }

    /// The kind's own default, if any.
    fn default_value(&self) -> Option<DefaultValue> {
        None
    }
}

/// A property descriptor: a kind plus the shared options.
///
/// Descriptors are built once when a schema is defined and are immutable and
/// shareable afterwards. Nothing about individual objects is stored on them.
#[derive(Clone)]
pub struct Property {
    kind: Arc<dyn PropertyKind>,
    required: bool,
    type_tag: Option<String>,
    enforcement: Option<Value>,
    clean_override: Option<CleanFn>,
    default_override: Option<DefaultFn>,
}

impl Property {
    /// Wrap a kind with default options.
    pub fn new(kind: impl PropertyKind + 'static) -> Self {
        Self {
            kind: Arc::new(kind),
            required: false,
            type_tag: None,
            enforcement: None,
            clean_override: None,
            default_override: None,
        }
    }

    /// Mark the property required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Fix the property to a constant.
    ///
    /// Validation becomes an exact-match check and the default becomes the
    /// constant; this takes precedence over any `clean` or `default`
    /// override.
    #[must_use]
    pub fn fixed(mut self, value: impl Into<Value>) -> Self {
        self.enforcement = Some(value.into());
        self
    }

    /// Supply a `clean` override.
    #[must_use]
    pub fn with_clean<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, PropertyError> + Send + Sync + 'static,
    {
        self.clean_override = Some(Arc::new(f));
        self
    }

    /// Supply a `default` override.
    #[must_use]
    pub fn with_default<F>(mut self, f: F) -> Self
    where
        F: Fn() -> DefaultValue + Send + Sync + 'static,
    {
        self.default_override = Some(Arc::new(f));
        self
    }

    /// Attach an object-type tag.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_tag = Some(type_name.into());
        self
    }

    /// Whether the owning object must supply this field.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The object-type tag, if any.
    pub fn type_tag(&self) -> Option<&str> {
        self.type_tag.as_deref()
    }

    /// The fixed constant, if any.
    pub fn fixed_value(&self) -> Option<&Value> {
        self.enforcement.as_ref()
    }

    /// Name of the underlying kind.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Coerce `value` without validating.
    ///
    /// Returns [`PropertyError::NoCoercion`] when neither the kind nor an
    /// override defines a coercion.
    pub fn clean(&self, value: &Value) -> Result<Value, PropertyError> {
        self.cleaner().clean(value)
    }

    /// Validate `value` for this property.
    ///
    /// # Errors
    ///
    /// [`PropertyError::FixedMismatch`] for a fixed property given another
    /// value, otherwise whatever the kind rejects.
    pub fn validate(&self, value: Value) -> Result<Value, PropertyError> {
        if let Some(fixed) = &self.enforcement {
            if &value != fixed {
                return Err(PropertyError::FixedMismatch {
                    expected: fixed.to_string(),
                });
            }
            return Ok(value);
        }
        self.kind.validate(value, &self.cleaner())
    }

    /// The default for this property, if it has one.
    pub fn default(&self) -> Option<DefaultValue> {
        if let Some(fixed) = &self.enforcement {
            return Some(DefaultValue::Value(fixed.clone()));
        }
        match &self.default_override {
            Some(f) => Some(f()),
            None => self.kind.default_value(),
        }
    }

    /// The value constructor: hands `value` back unchanged.
    ///
    /// List composition re-wraps every validated element through this.
    pub fn construct(&self, value: Value) -> Value {
        value
    }

    fn cleaner(&self) -> Cleaner<'_> {
        Cleaner {
            kind: self.kind.as_ref(),
            custom: self.clean_override.as_ref(),
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("type_tag", &self.type_tag)
            .field("fixed", &self.enforcement)
            .field("clean_override", &self.clean_override.is_some())
            .field("default_override", &self.default_override.is_some())
            .finish()
    }
}

/// A kind with no behavior of its own: no coercion, no default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseProperty;

impl PropertyKind for BaseProperty {
    fn name(&self) -> &'static str {
        "property"
    }
}

impl Property {
    /// A descriptor with only the base contract.
    pub fn base() -> Self {
        Self::new(BaseProperty)
    }
}
