//! # Identifier-Family Property Kinds
//!
//! - [`TypeProperty`] stamps every object with its type discriminator. It is
//!   a fixed-value property whose constant is the type name.
//! - [`IdProperty`] validates and generates the object's own
//!   `<type>--<uuid-v4>` identifier.
//! - [`ReferenceProperty`] validates identifiers of other objects, optionally
//!   restricted to one target type. Only syntax is checked.

use stix_core::{is_reference, type_prefix, PropertyError, StixId, Value};

use crate::property::{Cleaner, DefaultValue, Property, PropertyKind};

/// The object-type discriminator.
///
/// Carries no behavior of its own; [`Property::type_of`] fixes the
/// descriptor to the type name.
#[derive(Debug, Clone)]
pub struct TypeProperty {
    type_name: String,
}

impl TypeProperty {
    /// The type name this property is fixed to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

impl PropertyKind for TypeProperty {
    fn name(&self) -> &'static str {
        "type"
    }
}

/// The object's own identifier.
#[derive(Debug, Clone)]
pub struct IdProperty {
    object_type: String,
    required_prefix: String,
}

impl IdProperty {
    /// Identifier kind for objects of `object_type`.
    pub fn new(object_type: impl Into<String>) -> Self {
        let object_type = object_type.into();
        let required_prefix = type_prefix(&object_type);
        Self {
            object_type,
            required_prefix,
        }
    }

    /// The `<type>--` prefix identifiers must start with.
    pub fn required_prefix(&self) -> &str {
        &self.required_prefix
    }
}

impl PropertyKind for IdProperty {
    fn name(&self) -> &'static str {
        "id"
    }

    fn validate(&self, value: Value, _cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        let Some(text) = value.as_str() else {
            return Err(PropertyError::PrefixMismatch {
                expected: self.required_prefix.clone(),
            });
        };
        StixId::parse(&self.object_type, text)?;
        Ok(value)
    }

    fn default_value(&self) -> Option<DefaultValue> {
        let id = StixId::generate(&self.object_type);
        Some(DefaultValue::Value(Value::String(id.into_string())))
    }
}

/// A reference to another object, by identifier.
#[derive(Debug, Clone, Default)]
pub struct ReferenceProperty {
    target_type: Option<String>,
}

impl ReferenceProperty {
    /// A reference to an object of any type.
    pub fn any() -> Self {
        Self { target_type: None }
    }

    /// A reference that must point at an object of `target_type`.
    pub fn to(target_type: impl Into<String>) -> Self {
        Self {
            target_type: Some(target_type.into()),
        }
    }

    /// The required target type, if any.
    pub fn target_type(&self) -> Option<&str> {
        self.target_type.as_deref()
    }
}

impl PropertyKind for ReferenceProperty {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn validate(&self, value: Value, _cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        // A constructed object stands in for its identifier.
        let id = match &value {
            Value::Object(obj) => obj.id().ok_or(PropertyError::InvalidReference)?,
            Value::String(s) => s.as_str(),
            _ => return Err(PropertyError::InvalidReference),
        };
        if let Some(target) = &self.target_type {
            let prefix = type_prefix(target);
            if !id.starts_with(&prefix) {
                return Err(PropertyError::PrefixMismatch { expected: prefix });
            }
        }
        if !is_reference(id) {
            return Err(PropertyError::InvalidReference);
        }
        Ok(Value::String(id.to_string()))
    }
}

impl Property {
    /// The type discriminator, fixed to `type_name`.
    pub fn type_of(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self::new(TypeProperty {
            type_name: type_name.clone(),
        })
        .fixed(type_name)
    }

    /// The object's own identifier, for objects of `object_type`.
    pub fn id(object_type: impl Into<String>) -> Self {
        Self::new(IdProperty::new(object_type))
    }

    /// A reference to an object of any type.
    pub fn reference() -> Self {
        Self::new(ReferenceProperty::any())
    }

    /// A reference restricted to `target_type`. The target is also recorded
    /// as the descriptor's type tag.
    pub fn reference_to(target_type: impl Into<String>) -> Self {
        let target_type = target_type.into();
        Self::new(ReferenceProperty::to(target_type.clone())).with_type(target_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use stix_core::StixObject;

    const UUID: &str = "2ad2d51a-4d4c-4f07-a2c4-8e0b7b6a6f5e";

    #[test]
    fn type_property_is_fixed() {
        let p = Property::type_of("indicator");
        assert_eq!(
            p.validate(Value::from("indicator")).unwrap(),
            Value::from("indicator")
        );
        assert_eq!(
            p.validate(Value::from("malware")).unwrap_err().to_string(),
            "must equal 'indicator'."
        );
        assert_eq!(
            p.default(),
            Some(DefaultValue::Value(Value::from("indicator")))
        );
        assert_eq!(p.kind_name(), "type");
    }

    #[test]
    fn id_accepts_matching_identifier() {
        let p = Property::id("indicator");
        let id = format!("indicator--{UUID}");
        assert_eq!(p.validate(Value::from(id.as_str())).unwrap(), Value::from(id));
    }

    #[test]
    fn id_rejects_wrong_prefix() {
        let p = Property::id("indicator");
        assert_eq!(
            p.validate(Value::from(format!("malware--{UUID}")))
                .unwrap_err()
                .to_string(),
            "must start with 'indicator--'."
        );
        assert!(p.validate(Value::Int(3)).is_err());
    }

    #[test]
    fn id_rejects_bad_uuid() {
        let p = Property::id("indicator");
        assert_eq!(
            p.validate(Value::from("indicator--1234"))
                .unwrap_err()
                .to_string(),
            "must have a valid version 4 UUID after the prefix."
        );
    }

    #[test]
    fn id_default_validates_and_is_fresh() {
        let p = Property::id("campaign");
        let Some(DefaultValue::Value(a)) = p.default() else {
            panic!("id default must be a concrete value");
        };
        let Some(DefaultValue::Value(b)) = p.default() else {
            panic!("id default must be a concrete value");
        };
        assert!(a.as_str().unwrap().starts_with("campaign--"));
        assert_ne!(a, b);
        assert_eq!(p.validate(a.clone()).unwrap(), a);
    }

    #[test]
    fn reference_scoped_to_type() {
        let p = Property::reference_to("malware");
        assert!(p.validate(Value::from(format!("malware--{UUID}"))).is_ok());
        assert_eq!(
            p.validate(Value::from(format!("campaign--{UUID}")))
                .unwrap_err(),
            PropertyError::PrefixMismatch {
                expected: "malware--".into()
            }
        );
        assert_eq!(p.type_tag(), Some("malware"));
    }

    #[test]
    fn reference_unscoped_checks_grammar() {
        let p = Property::reference();
        assert!(p.validate(Value::from(format!("attack-pattern--{UUID}"))).is_ok());
        assert_eq!(
            p.validate(Value::from("malware--xyz")).unwrap_err().to_string(),
            "must match <object-type>--<guid>."
        );
        assert!(p.validate(Value::Int(1)).is_err());
    }

    #[test]
    fn reference_scoped_still_checks_grammar() {
        let p = Property::reference_to("malware");
        assert_eq!(
            p.validate(Value::from("malware--xyz")).unwrap_err(),
            PropertyError::InvalidReference
        );
    }

    #[test]
    fn reference_extracts_id_from_object() {
        let mut fields = BTreeMap::new();
        fields.insert("type".to_string(), Value::from("malware"));
        fields.insert("id".to_string(), Value::from(format!("malware--{UUID}")));
        let obj = StixObject::new("malware", fields);

        let p = Property::reference_to("malware");
        assert_eq!(
            p.validate(Value::Object(obj)).unwrap(),
            Value::from(format!("malware--{UUID}"))
        );

        let anonymous = StixObject::new("malware", BTreeMap::new());
        assert_eq!(
            p.validate(Value::Object(anonymous)).unwrap_err(),
            PropertyError::InvalidReference
        );
    }
}
