//! # Scalar Property Kinds
//!
//! Leaf validators with no dependencies on each other: text, boolean,
//! timestamp, and selector path.

use stix_core::{date_at_legacy_midnight, is_selector, parse_timestamp, PropertyError, Value};

use crate::property::{Cleaner, Property, PropertyKind};

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

/// Text. Any value is coerced through its display form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringProperty;

/// Coerce any value to text.
pub fn coerce_text(value: Value) -> Result<Value, PropertyError> {
    match value {
        Value::String(_) => Ok(value),
        other => Ok(Value::String(other.to_string())),
    }
}

impl PropertyKind for StringProperty {
    fn name(&self) -> &'static str {
        "string"
    }

    fn clean(&self, value: &Value) -> Result<Value, PropertyError> {
        coerce_text(value.clone())
    }

    fn validate(&self, value: Value, cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        cleaner.clean(&value)
    }
}

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

const TRUES: &[&str] = &["true", "t"];
const FALSES: &[&str] = &["false", "f"];

/// Boolean. Accepts native booleans, `true`/`t`/`false`/`f` in any case,
/// and the numbers 1 and 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanProperty;

impl PropertyKind for BooleanProperty {
    fn name(&self) -> &'static str {
        "boolean"
    }

    fn clean(&self, value: &Value) -> Result<Value, PropertyError> {
        let coerced = match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => {
                let lower = s.to_lowercase();
                if TRUES.contains(&lower.as_str()) {
                    Some(true)
                } else if FALSES.contains(&lower.as_str()) {
                    Some(false)
                } else {
                    None
                }
            }
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            Value::Float(x) if *x == 1.0 => Some(true),
            Value::Float(x) if *x == 0.0 => Some(false),
            _ => None,
        };
        coerced
            .map(Value::Bool)
            .ok_or(PropertyError::NotCoercible { target: "boolean" })
    }

    fn validate(&self, value: Value, cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        cleaner.clean(&value).map_err(|_| PropertyError::NotBoolean)
    }
}

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// Timestamp. Output is always zone-aware.
///
/// - Date-times with a time component pass through unchanged.
/// - Bare dates become midnight at the legacy reference offset
///   (see [`stix_core::LEGACY_DATE_OFFSET_SECS`]).
/// - Text is parsed permissively; zone-aware text is converted to UTC and
///   zone-less text is labeled UTC without shifting.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampProperty;

impl PropertyKind for TimestampProperty {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn validate(&self, value: Value, _cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        match value {
            Value::DateTime(_) => Ok(value),
            Value::Date(date) => {
                let dt = date_at_legacy_midnight(date)?;
                tracing::warn!(
                    date = %date,
                    offset = %dt.offset(),
                    "date-only timestamp stamped with legacy reference offset instead of UTC"
                );
                Ok(Value::DateTime(dt))
            }
            Value::String(s) => Ok(Value::DateTime(parse_timestamp(&s)?.into_utc())),
            _ => Err(PropertyError::UnrecognizedTimestamp),
        }
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// Selector path such as `external_references.[0].source_name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorProperty;

impl SelectorProperty {
    /// Build a selector kind for an object type. The type is accepted so
    /// call sites can treat every kind alike; selectors do not use it.
    pub fn for_type(_object_type: &str) -> Self {
        Self
    }
}

impl PropertyKind for SelectorProperty {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn validate(&self, value: Value, _cleaner: &Cleaner<'_>) -> Result<Value, PropertyError> {
        if value.as_str().is_some_and(is_selector) {
            Ok(value)
        } else {
            Err(PropertyError::InvalidSelector)
        }
    }
}

impl Property {
    /// A text property.
    pub fn string() -> Self {
        Self::new(StringProperty)
    }

    /// A boolean property.
    pub fn boolean() -> Self {
        Self::new(BooleanProperty)
    }

    /// A timestamp property.
    pub fn timestamp() -> Self {
        Self::new(TimestampProperty)
    }

    /// A selector-path property.
    pub fn selector() -> Self {
        Self::new(SelectorProperty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

    #[test]
    fn string_coerces_everything() {
        let p = Property::string();
        assert_eq!(p.validate(Value::from("abc")).unwrap(), Value::from("abc"));
        assert_eq!(p.validate(Value::Int(42)).unwrap(), Value::from("42"));
        assert_eq!(p.validate(Value::Bool(false)).unwrap(), Value::from("false"));
        assert_eq!(p.validate(Value::Float(2.5)).unwrap(), Value::from("2.5"));
        assert_eq!(p.validate(Value::Float(1.0)).unwrap(), Value::from("1.0"));
        assert_eq!(p.validate(Value::Int(1)).unwrap(), Value::from("1"));
        assert_eq!(p.clean(&Value::Int(1)).unwrap(), Value::from("1"));
    }

    #[test]
    fn string_respects_clean_override() {
        let p = Property::string()
            .with_clean(|_| Err(PropertyError::NotCoercible { target: "string" }));
        assert_eq!(
            p.validate(Value::from("abc")).unwrap_err(),
            PropertyError::NotCoercible { target: "string" }
        );
    }

    #[test]
    fn boolean_truthy_inputs() {
        let p = Property::boolean();
        for v in [
            Value::Bool(true),
            Value::from("true"),
            Value::from("T"),
            Value::from("TRUE"),
            Value::Int(1),
            Value::Float(1.0),
        ] {
            assert_eq!(p.validate(v.clone()).unwrap(), Value::Bool(true), "{v:?}");
        }
    }

    #[test]
    fn boolean_falsy_inputs() {
        let p = Property::boolean();
        for v in [
            Value::Bool(false),
            Value::from("false"),
            Value::from("f"),
            Value::from("False"),
            Value::Int(0),
        ] {
            assert_eq!(p.validate(v.clone()).unwrap(), Value::Bool(false), "{v:?}");
        }
    }

    #[test]
    fn boolean_rejection_is_reframed() {
        let p = Property::boolean();
        for v in [Value::from("maybe"), Value::Int(2), Value::Null, Value::from("")] {
            assert_eq!(
                p.validate(v).unwrap_err().to_string(),
                "must be a boolean value."
            );
        }
        // The underlying cause is visible through clean.
        assert_eq!(
            p.clean(&Value::from("maybe")).unwrap_err(),
            PropertyError::NotCoercible { target: "boolean" }
        );
    }

    #[test]
    fn timestamp_datetime_passes_through() {
        let offset = FixedOffset::east_opt(3600).unwrap();
        let dt = offset.with_ymd_and_hms(2017, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            Property::timestamp().validate(Value::DateTime(dt)).unwrap(),
            Value::DateTime(dt)
        );
    }

    #[test]
    fn timestamp_date_only_gets_legacy_offset() {
        let date = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let out = Property::timestamp().validate(Value::Date(date)).unwrap();
        let dt = out.as_datetime().copied().unwrap();
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.minute(), 0);
        assert_eq!(dt.date_naive(), date);
        // Not UTC.
        assert_ne!(dt.offset().local_minus_utc(), 0);
        assert_eq!(
            dt.offset().local_minus_utc(),
            -stix_core::LEGACY_DATE_OFFSET_SECS
        );
    }

    #[test]
    fn timestamp_offset_text_is_converted() {
        let out = Property::timestamp()
            .validate(Value::from("2017-01-01T12:34:56-05:00"))
            .unwrap();
        let expected = Utc.with_ymd_and_hms(2017, 1, 1, 17, 34, 56).unwrap();
        assert_eq!(out, Value::from(expected));
        assert_eq!(out.to_string(), "2017-01-01T17:34:56Z");
    }

    #[test]
    fn timestamp_naive_text_is_labeled_utc() {
        let out = Property::timestamp()
            .validate(Value::from("2017-01-01 12:34:56"))
            .unwrap();
        assert_eq!(out.to_string(), "2017-01-01T12:34:56Z");
    }

    #[test]
    fn timestamp_short_years_are_recent() {
        let p = Property::timestamp();
        for text in ["04/06/16", "6 April 16", "Apr 6 16"] {
            let out = p.validate(Value::from(text)).unwrap();
            assert_eq!(out.to_string(), "2016-04-06T00:00:00Z", "input {text:?}");
        }
        let out = p.validate(Value::from("April 2016")).unwrap();
        assert!(out.to_string().starts_with("2016-04-"), "got {out}");
    }

    #[test]
    fn timestamp_accepts_natural_forms() {
        let p = Property::timestamp();
        for text in [
            "20160406T200348Z",
            "Apr 6 2016 20:03:48",
            "April 6, 2016 8:03:48 PM",
            "Wed Apr 6 20:03:48 UTC 2016",
            "Wednesday, April 6, 2016 20:03:48",
        ] {
            let out = p.validate(Value::from(text)).unwrap();
            assert_eq!(out.to_string(), "2016-04-06T20:03:48Z", "input {text:?}");
        }
    }

    #[test]
    fn timestamp_rejects_garbage() {
        let p = Property::timestamp();
        for v in [Value::from("yesterday-ish"), Value::Int(5), Value::Null] {
            assert_eq!(
                p.validate(v).unwrap_err().to_string(),
                "must be a datetime object, date object, or timestamp string in a recognizable format."
            );
        }
    }

    #[test]
    fn timestamp_is_idempotent_once_utc() {
        let p = Property::timestamp();
        let once = p.validate(Value::from("2017-01-01T07:00:00+02:00")).unwrap();
        let twice = p.validate(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn selector_grammar() {
        let p = Property::selector();
        assert!(p.validate(Value::from("abc.b.[0].c")).is_ok());
        assert!(p.validate(Value::from("description")).is_ok());
        assert_eq!(
            p.validate(Value::from("ab")).unwrap_err().to_string(),
            "values must adhere to selector syntax"
        );
        assert!(p.validate(Value::Int(3)).is_err());
    }

    #[test]
    fn selector_ignores_type() {
        let p = Property::new(SelectorProperty::for_type("indicator"));
        assert!(p.validate(Value::from("pattern")).is_ok());
        assert!(p.type_tag().is_none());
    }
}
