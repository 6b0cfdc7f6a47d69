//! # Error Hierarchy
//!
//! Structured error types for property validation and object construction,
//! built with `thiserror`. No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! [`PropertyError`] is the single value-rejection kind of the property
//! layer. Every variant renders the human-readable reason a field value was
//! refused. [`ObjectError`] wraps those rejections with the name of the
//! offending field when a whole object is being assembled.

use thiserror::Error;

/// Top-level error type for the STIX validation stack.
#[derive(Error, Debug)]
pub enum StixError {
    /// A single property value was rejected.
    #[error("property error: {0}")]
    Property(#[from] PropertyError),

    /// Object construction failed.
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A property value was rejected.
///
/// Display strings are the reasons surfaced to users; they are part of the
/// public contract and tests pin them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The kind defines no coercion. Consumed by the default `validate`
    /// composition, which passes the raw value through instead.
    #[error("no coercion defined for this property kind")]
    NoCoercion,

    /// Identifier does not begin with the required `<type>--` prefix.
    #[error("must start with '{expected}'.")]
    PrefixMismatch {
        /// The prefix the value had to start with.
        expected: String,
    },

    /// The identifier suffix is not a version 4 UUID.
    #[error("must have a valid version 4 UUID after the prefix.")]
    InvalidUuid,

    /// Reference string does not match `<object-type>--<uuid>`.
    #[error("must match <object-type>--<guid>.")]
    InvalidReference,

    /// Value could not be coerced into the target primitive.
    #[error("not a coercible {target} value.")]
    NotCoercible {
        /// Name of the primitive the coercion targeted.
        target: &'static str,
    },

    /// Boolean validation failed.
    #[error("must be a boolean value.")]
    NotBoolean,

    /// List input cannot be iterated.
    #[error("must be an iterable.")]
    NotIterable,

    /// List produced no elements.
    #[error("must not be empty.")]
    EmptyList,

    /// Value differs from the descriptor's fixed constant.
    #[error("must equal '{expected}'.")]
    FixedMismatch {
        /// Display form of the fixed constant.
        expected: String,
    },

    /// Timestamp input is neither a date/time value nor a parseable string.
    #[error("must be a datetime object, date object, or timestamp string in a recognizable format.")]
    UnrecognizedTimestamp,

    /// Selector path does not follow the selector grammar.
    #[error("values must adhere to selector syntax")]
    InvalidSelector,

    /// A nested object given as a field mapping failed to construct.
    #[error("invalid nested object: {0}")]
    NestedObject(Box<ObjectError>),
}

impl PropertyError {
    /// True for the internal "no coercion defined" signal.
    pub fn is_no_coercion(&self) -> bool {
        matches!(self, PropertyError::NoCoercion)
    }
}

/// Object construction errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    /// A required property was neither supplied nor defaulted.
    #[error("missing required property '{property}' for {object_type}")]
    MissingRequired {
        /// The object type being constructed.
        object_type: String,
        /// The missing property name.
        property: String,
    },

    /// A supplied property value was rejected by its descriptor.
    #[error("invalid value for {object_type} property '{property}': {source}")]
    InvalidProperty {
        /// The object type being constructed.
        object_type: String,
        /// The property whose value was rejected.
        property: String,
        /// The underlying rejection.
        #[source]
        source: PropertyError,
    },

    /// Fields were supplied that the schema does not declare.
    #[error("unexpected properties for {object_type}: {}", .properties.join(", "))]
    UnexpectedProperties {
        /// The object type being constructed.
        object_type: String,
        /// Undeclared field names, sorted.
        properties: Vec<String>,
    },

    /// An already-constructed object of the wrong type was nested.
    #[error("expected a {expected} object, got {actual}")]
    TypeMismatch {
        /// The object type the schema builds.
        expected: String,
        /// The type of the object that was supplied.
        actual: String,
    },
}
