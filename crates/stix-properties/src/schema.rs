//! # Object Schemas
//!
//! An [`ObjectSchema`] names an object type and declares its properties.
//! [`ObjectSchema::construct`] drives one validation pass over keyword-style
//! fields and produces a [`StixObject`].
//!
//! ## Construction Rules
//!
//! 1. Fields the schema does not declare are rejected together.
//! 2. Supplied fields are validated in declaration order; the first
//!    rejection aborts construction.
//! 3. Absent fields take their property's default. [`DefaultValue::Now`] is
//!    resolved to one instant per construction, shared by every field that
//!    defaulted to it.
//! 4. Absent required fields without a default are an error.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use stix_core::{utc_offset, ObjectError, StixObject, Value};

use crate::property::{DefaultValue, Property};

/// The declared properties of one object type.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    type_name: String,
    properties: Vec<(String, Property)>,
}

impl ObjectSchema {
    /// An empty schema for `type_name`.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
        }
    }

    /// A schema for `type_name` pre-populated with the properties every
    /// top-level object carries: `type`, `id`, `created`, and `modified`.
    ///
    /// `created` and `modified` default to the construction instant, so an
    /// object built without them has identical values in both.
    pub fn with_core_properties(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(type_name.clone())
            .property("type", Property::type_of(type_name.clone()))
            .property("id", Property::id(type_name))
            .property(
                "created",
                Property::timestamp().with_default(|| DefaultValue::Now),
            )
            .property(
                "modified",
                Property::timestamp().with_default(|| DefaultValue::Now),
            )
    }

    /// Declare a property. Redeclaring a name replaces the earlier
    /// descriptor in place.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, property: Property) -> Self {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = property,
            None => self.properties.push((name, property)),
        }
        self
    }

    /// The object type this schema builds.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a declared property.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p)
    }

    /// Declared properties, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Construct an object from keyword-style fields.
    ///
    /// # Errors
    ///
    /// See the module documentation for the rules; each violation maps to
    /// one [`ObjectError`] variant.
    pub fn construct(&self, fields: BTreeMap<String, Value>) -> Result<StixObject, ObjectError> {
        self.build(fields, || Utc::now().with_timezone(&utc_offset()))
    }

    /// Construct an object, resolving [`DefaultValue::Now`] to `now`.
    pub fn construct_at(
        &self,
        fields: BTreeMap<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<StixObject, ObjectError> {
        self.build(fields, || now.with_timezone(&utc_offset()))
    }

    fn build<F>(
        &self,
        mut fields: BTreeMap<String, Value>,
        clock: F,
    ) -> Result<StixObject, ObjectError>
    where
        F: Fn() -> DateTime<FixedOffset>,
    {
        let unexpected: Vec<String> = fields
            .keys()
            .filter(|k| self.get(k).is_none())
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(ObjectError::UnexpectedProperties {
                object_type: self.type_name.clone(),
                properties: unexpected,
            });
        }

        let mut now: Option<DateTime<FixedOffset>> = None;
        let mut out = BTreeMap::new();

        for (name, property) in &self.properties {
            if let Some(raw) = fields.remove(name) {
                let value = property.validate(raw).map_err(|source| {
                    tracing::debug!(
                        object_type = %self.type_name,
                        property = %name,
                        error = %source,
                        "property value rejected"
                    );
                    ObjectError::InvalidProperty {
                        object_type: self.type_name.clone(),
                        property: name.clone(),
                        source,
                    }
                })?;
                out.insert(name.clone(), value);
                continue;
            }

            match property.default() {
                Some(DefaultValue::Value(value)) => {
                    out.insert(name.clone(), value);
                }
                Some(DefaultValue::Now) => {
                    let instant = *now.get_or_insert_with(|| {
                        let instant = clock();
                        tracing::trace!(
                            object_type = %self.type_name,
                            now = %instant,
                            "resolved NOW default"
                        );
                        instant
                    });
                    out.insert(name.clone(), Value::DateTime(instant));
                }
                None if property.is_required() => {
                    return Err(ObjectError::MissingRequired {
                        object_type: self.type_name.clone(),
                        property: name.clone(),
                    });
                }
                None => {}
            }
        }

        Ok(StixObject::new(self.type_name.clone(), out))
    }
}
