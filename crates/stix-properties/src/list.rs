//! # List Properties
//!
//! A [`ListProperty`] validates every element of an iterable input through
//! an element kind and refuses to produce an empty list.
//!
//! The element kind is resolved once, when the schema is defined, into an
//! [`ElementKind`]:
//!
//! - `Primitive`: a bare coercion function with no validation step. The
//!   element is accepted as given and then coerced.
//! - `Property`: a nested descriptor whose `validate` runs per element.
//! - `Object`: a nested object schema. Mapping elements are constructed
//!   through it as keyword-style fields; constructed objects pass through.

use std::sync::Arc;

use stix_core::{ObjectError, PropertyError, Value};

use crate::property::{Cleaner, Property, PropertyKind};
use crate::scalar::coerce_text;
use crate::schema::ObjectSchema;

/// A primitive coercion applied to each element.
pub type PrimitiveFn = fn(Value) -> Result<Value, PropertyError>;

/// What a list's elements are validated and re-wrapped with.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// A bare coercion with no validation step.
    Primitive {
        /// Name of the primitive, for diagnostics.
        name: &'static str,
        /// The coercion.
        coerce: PrimitiveFn,
    },
    /// A nested property descriptor.
    Property(Box<Property>),
    /// A nested object schema.
    Object(Arc<ObjectSchema>),
}

/// Truthiness coercion used for lists of booleans.
pub fn coerce_truthiness(value: Value) -> Result<Value, PropertyError> {
    Ok(Value::Bool(value.is_truthy()))
}

impl ElementKind {
    /// Elements coerced to text.
    pub fn string() -> Self {
        ElementKind::Primitive {
            name: "string",
            coerce: coerce_text,
        }
    }

    /// Elements coerced to booleans by truthiness.
    ///
    /// This is the primitive conversion, not [`crate::BooleanProperty`]
    /// validation: the text `"false"` is truthy. Use
    /// `ElementKind::property(Property::boolean())` for checked booleans.
    pub fn boolean() -> Self {
        ElementKind::Primitive {
            name: "boolean",
            coerce: coerce_truthiness,
        }
    }

    /// Elements coerced by an arbitrary primitive function.
    pub fn primitive(name: &'static str, coerce: PrimitiveFn) -> Self {
        ElementKind::Primitive { name, coerce }
    }

    /// Elements validated by a nested descriptor.
    pub fn property(property: Property) -> Self {
        ElementKind::Property(Box::new(property))
    }

    /// Elements that are objects of `schema`.
    pub fn object(schema: Arc<ObjectSchema>) -> Self {
        ElementKind::Object(schema)
    }

    /// Short name of the element kind, for diagnostics.
    pub fn name(&self) -> &str {
        match self {
            ElementKind::Primitive { name, .. } => name,
            ElementKind::Property(p) => p.kind_name(),
            ElementKind::Object(schema) => schema.type_name(),
        }
    }

    /// Per-element validation step.
    fn validate(&self, item: Value) -> Result<Value, PropertyError> {
        match self {
            ElementKind::Primitive { .. } | ElementKind::Object(_) => Ok(item),
            ElementKind::Property(p) => p.validate(item),
        }
    }

    /// Re-wrap a validated element through the element kind's constructor.
    fn construct(&self, item: Value) -> Result<Value, PropertyError> {
        match self {
            ElementKind::Primitive { coerce, .. } => coerce(item),
            ElementKind::Property(p) => Ok(p.construct(item)),
            ElementKind::Object(schema) => match item {
                Value::Map(fields) => schema
                    .construct(fields)
                    .map(Value::Object)
                    .map_err(|e| PropertyError::NestedObject(Box::new(e))),
                Value::Object(obj) if obj.type_name() == schema.type_name() => {
                    Ok(Value::Object(obj))
                }
                Value::Object(obj) => Err(PropertyError::NestedObject(Box::new(
                    ObjectError::TypeMismatch {
                        expected: schema.type_name().to_string(),
                        actual: obj.type_name().to_string(),
                    },
                ))),
                _ => Err(PropertyError::NotCoercible { target: "object" }),
            },
        }
    }
}

impl From<Property> for ElementKind {
    fn from(property: Property) -> Self {
        ElementKind::property(property)
    }
}

impl From<Arc<ObjectSchema>> for ElementKind {
    fn from(schema: Arc<ObjectSchema>) -> Self {
        ElementKind::object(schema)
    }
}

/// A non-empty list of elements of one kind.
#[derive(Debug, Clone)]
pub struct ListProperty {
    element: ElementKind,
}

impl ListProperty {
    /// List of `element`.
    pub fn new(element: impl Into<ElementKind>) -> Self {
        Self {
            element: element.into(),
        }
    }

    /// The element kind.
    pub fn element(&self) -> &ElementKind {
        &self.element
    }
}

impl PropertyKind for ListProperty {
    fn name(&self) -> &'static str {
        "list"
    }

    fn validate(&self, value: Value, _cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        let items = value.iter_elements().ok_or(PropertyError::NotIterable)?;

        let mut result = Vec::with_capacity(items.len());
        for item in items {
            let valid = self.element.validate(item)?;
            result.push(self.element.construct(valid)?);
        }

        if result.is_empty() {
            return Err(PropertyError::EmptyList);
        }
        Ok(Value::List(result))
    }
}

impl Property {
    /// A non-empty list of `element`.
    pub fn list(element: impl Into<ElementKind>) -> Self {
        Self::new(ListProperty::new(element))
    }
}
