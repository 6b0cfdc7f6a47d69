//! # stix-properties — Declarative Property Type System
//!
//! Every STIX object type declares a fixed set of named properties. Each
//! property says how raw input is cleaned, validated, and defaulted, and
//! whether a constant value is enforced. This crate provides those property
//! kinds and the driver that applies them to build objects.
//!
//! ## Layers
//!
//! 1. **Base contract**: [`PropertyKind`] (clean / validate / default) and
//!    the [`Property`] descriptor with its shared options (`required`,
//!    `fixed`, overrides, type tag).
//! 2. **Scalar kinds**: [`StringProperty`], [`BooleanProperty`],
//!    [`TimestampProperty`], [`SelectorProperty`].
//! 3. **Identifier kinds**: [`TypeProperty`], [`IdProperty`],
//!    [`ReferenceProperty`].
//! 4. **Composition**: [`ListProperty`] over an [`ElementKind`].
//! 5. **Deferred defaults**: [`DefaultValue::Now`], resolved once per
//!    [`ObjectSchema::construct`] call.
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use stix_properties::{ElementKind, ObjectSchema, Property};
//! use stix_core::Value;
//!
//! let schema = ObjectSchema::with_core_properties("indicator")
//!     .property("labels", Property::list(ElementKind::string()).required())
//!     .property("pattern", Property::string().required());
//!
//! let mut fields = BTreeMap::new();
//! fields.insert("labels".to_string(), Value::from(vec!["malicious-activity"]));
//! fields.insert("pattern".to_string(), Value::from("[file:name = 'x.exe']"));
//!
//! let indicator = schema.construct(fields).unwrap();
//! assert!(indicator.id().unwrap().starts_with("indicator--"));
//! assert_eq!(indicator.get("created"), indicator.get("modified"));
//! ```
//!
//! ## Crate Policy
//!
//! - Descriptors are immutable after schema definition and `Send + Sync`.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod identity;
pub mod list;
pub mod property;
pub mod scalar;
pub mod schema;

pub use identity::{IdProperty, ReferenceProperty, TypeProperty};
pub use list::{coerce_truthiness, ElementKind, ListProperty, PrimitiveFn};
pub use property::{
    BaseProperty, CleanFn, Cleaner, DefaultFn, DefaultValue, Property, PropertyKind,
};
pub use scalar::{
    coerce_text, BooleanProperty, SelectorProperty, StringProperty, TimestampProperty,
};
pub use schema::ObjectSchema;
